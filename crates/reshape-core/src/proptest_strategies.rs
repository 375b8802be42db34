//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but valid JSON values and transformation steps for property testing.

#![cfg(test)]

use crate::transform::{TransformationKind, TransformationStep};
use proptest::collection::{hash_map, vec};
use proptest::option;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating arbitrary JSON values
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 ]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..5).prop_map(Value::Array),
                hash_map(field_name_strategy(), inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating field names
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for generating dot paths of one to three segments
pub fn field_path_strategy() -> impl Strategy<Value = String> {
    vec(field_name_strategy(), 1..=3).prop_map(|segments| segments.join("."))
}

/// Strategy for generating transformation kinds
pub fn transformation_kind_strategy() -> impl Strategy<Value = TransformationKind> {
    proptest::sample::select(TransformationKind::ALL.to_vec())
}

/// Strategy for generating operation names, known and unknown
pub fn operation_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(vec![
            "uppercase",
            "lowercase",
            "trim",
            "title_case",
            "parse_number",
            "to_string",
            "parse_boolean",
            "multiply",
            "sum",
            "avg",
            "count",
            "max",
            "min",
            "concat",
            "object",
            "array",
            "exists",
            "equals",
            "greater_than",
            "contains",
            "desc",
        ])
        .prop_map(str::to_string),
        "[a-z_]{1,10}",
    ]
}

/// Strategy for generating condition expressions, some of them malformed
pub fn condition_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (field_name_strategy(), -100i64..100).prop_map(|(f, n)| format!("{} > {}", f, n)),
        (field_name_strategy(), "[a-z]{0,5}").prop_map(|(f, s)| format!("{} == '{}'", f, s)),
        (field_name_strategy(), field_name_strategy())
            .prop_map(|(a, b)| format!("{} && !{}", a, b)),
        "[a-z<>=!&|() '0-9]{0,20}",
    ]
}

/// Strategy for generating steps without nested steps
pub fn flat_step_strategy() -> impl Strategy<Value = TransformationStep> {
    (
        transformation_kind_strategy(),
        option::of(field_path_strategy()),
        option::of(field_path_strategy()),
        option::of(operation_strategy()),
        option::of(json_value_strategy()),
        option::of(condition_strategy()),
    )
        .prop_map(|(kind, field, output_field, operation, value, condition)| {
            TransformationStep {
                field,
                output_field,
                operation,
                value,
                condition,
                ..TransformationStep::new(kind)
            }
        })
}

/// Strategy for generating steps with up to two levels of nesting
pub fn step_strategy() -> impl Strategy<Value = TransformationStep> {
    flat_step_strategy().prop_recursive(2, 8, 3, |inner| {
        (
            flat_step_strategy(),
            option::of(inner.clone()),
            option::of(inner.clone()),
            option::of(vec(inner, 0..3)),
        )
            .prop_map(|(step, on_true, on_false, items)| TransformationStep {
                true_transformation: on_true.map(Box::new),
                false_transformation: on_false.map(Box::new),
                item_transformations: items,
                ..step
            })
    })
}

/// Strategy for generating records with a numeric `x` field
pub fn record_strategy() -> impl Strategy<Value = Value> {
    (-1000i64..1000, "[a-z]{0,6}").prop_map(|(x, tag)| json!({"x": x, "tag": tag}))
}
