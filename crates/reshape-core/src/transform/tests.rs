//! Tests for the step interpreter
//!
//! One section per transformation kind, plus error policy and value
//! semantics checks.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::{apply, built_in, TransformationKind, TransformationStep, TransformationStepBuilder};
use serde_json::{json, Value};

fn step_from(value: Value) -> TransformationStep {
    serde_json::from_value(value).unwrap()
}

fn run(data: Value, step: Value) -> Value {
    apply(&data, &step_from(step)).unwrap()
}

// Deserialization

#[test]
fn test_step_wire_format() {
    let step = step_from(json!({
        "type": "conditional",
        "condition": "age >= 18",
        "trueTransformation": {"type": "map", "field": "a", "outputField": "b"},
        "continueOnError": false
    }));
    assert_eq!(step.known_kind(), Some(TransformationKind::Conditional));
    assert_eq!(step.true_transformation.as_ref().unwrap().kind_name(), "map");
    assert_eq!(step.continue_on_error, Some(false));
    assert_eq!(step.depth(), 2);
}

#[test]
fn test_kind_alias_and_unknown_kind() {
    let step = step_from(json!({"kind": "extract", "field": "a"}));
    assert_eq!(step.known_kind(), Some(TransformationKind::Extract));

    let step = step_from(json!({"type": "pivot"}));
    assert_eq!(step.known_kind(), None);
    assert_eq!(step.kind_name(), "pivot");
}

#[test]
fn test_explicit_null_value_is_kept() {
    let step = step_from(json!({"type": "filter", "operation": "equals", "field": "a", "value": null}));
    assert_eq!(step.value, Some(Value::Null));
    let step = step_from(json!({"type": "filter", "operation": "exists", "field": "a"}));
    assert_eq!(step.value, None);
}

#[test]
fn test_unsupported_kind_fails() {
    let err = apply(&json!({}), &step_from(json!({"type": "pivot"}))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Transformation failed: Unsupported transformation type: pivot"
    );
}

// map

#[test]
fn test_map_copies_field() {
    let result = run(
        json!({"user": {"name": "ana"}}),
        json!({"type": "map", "field": "user.name", "outputField": "profile.displayName"}),
    );
    assert_eq!(
        result,
        json!({"user": {"name": "ana"}, "profile": {"displayName": "ana"}})
    );
}

#[test]
fn test_map_without_paths_is_noop() {
    let data = json!({"a": 1});
    assert_eq!(run(data.clone(), json!({"type": "map", "field": "a"})), data);
    assert_eq!(run(data.clone(), json!({"type": "map", "outputField": "b"})), data);
    assert_eq!(
        run(data.clone(), json!({"type": "map", "field": "missing", "outputField": "b"})),
        data
    );
}

#[test]
fn test_map_copies_explicit_null() {
    let result = run(
        json!({"a": null}),
        json!({"type": "map", "field": "a", "outputField": "b"}),
    );
    assert_eq!(result, json!({"a": null, "b": null}));
}

#[test]
fn test_map_writes_through_null_array_element() {
    let step = json!({"type": "map", "field": "x", "outputField": "items.0.b"});
    assert_eq!(
        run(json!({"x": 1, "items": [null]}), step),
        json!({"x": 1, "items": [{"b": 1}]})
    );

    let step = json!({"type": "map", "field": "x", "outputField": "a.b"});
    assert_eq!(
        run(json!({"x": 1, "a": null}), step),
        json!({"x": 1, "a": {"b": 1}})
    );
}

// filter

#[test]
fn test_filter_array_structured() {
    let data = json!([{"x": 1}, {"x": 5}, {"x": 3}, {"x": 9}]);
    let result = run(
        data,
        json!({"type": "filter", "operation": "greater_than", "field": "x", "value": 2}),
    );
    assert_eq!(result, json!([{"x": 5}, {"x": 3}, {"x": 9}]));
}

#[test]
fn test_filter_array_condition() {
    let data = json!([
        {"name": "a", "age": 17, "active": true},
        {"name": "b", "age": 30, "active": false},
        {"name": "c", "age": 42, "active": true}
    ]);
    let result = run(
        data,
        json!({"type": "filter", "condition": "age >= 18 && active"}),
    );
    assert_eq!(result, json!([{"name": "c", "age": 42, "active": true}]));
}

#[test]
fn test_filter_scalar_and_object() {
    let step = json!({"type": "filter", "condition": "status == 'ok'"});
    assert_eq!(run(json!({"status": "ok"}), step.clone()), json!({"status": "ok"}));
    assert_eq!(run(json!({"status": "down"}), step), Value::Null);
}

#[test]
fn test_filter_without_condition_passes_through() {
    let data = json!([1, 2, 3]);
    assert_eq!(run(data.clone(), json!({"type": "filter"})), data);
}

#[test]
fn test_filter_with_broken_condition_drops_everything() {
    let result = run(json!([{"a": 1}, {"a": 2}]), json!({"type": "filter", "condition": "a >"}));
    assert_eq!(result, json!([]));
}

// format

#[test]
fn test_format_operations() {
    let cases = [
        ("uppercase", json!("ana"), json!("ANA")),
        ("lowercase", json!("ANA"), json!("ana")),
        ("trim", json!("  ana "), json!("ana")),
        ("title_case", json!("hELLO wORLD"), json!("Hello World")),
        ("number", json!("42"), json!(42)),
        ("parse_number", json!("2.5"), json!(2.5)),
        ("parse_number", json!("abc"), Value::Null),
        ("string", json!(7), json!("7")),
        ("to_string", json!(true), json!("true")),
        ("boolean", json!("TRUE"), json!(true)),
        ("parse_boolean", json!("1"), json!(true)),
        ("parse_boolean", json!("yes"), json!(false)),
        ("parse_boolean", json!(1), json!(true)),
        ("unknown_op", json!("same"), json!("same")),
    ];

    for (operation, input, expected) in cases {
        let result = run(
            json!({"v": input}),
            json!({"type": "format", "field": "v", "operation": operation}),
        );
        assert_eq!(result, json!({"v": expected}), "operation {}", operation);
    }
}

#[test]
fn test_format_multiply() {
    let step = json!({"type": "format", "field": "price", "operation": "multiply", "value": 3});
    assert_eq!(run(json!({"price": 2.5}), step.clone()), json!({"price": 7.5}));
    assert_eq!(run(json!({"price": "2.5"}), step), json!({"price": "2.5"}));
}

#[test]
fn test_format_paths() {
    // outputField doubles as the read path when field is absent
    let result = run(
        json!({"name": "ana"}),
        json!({"type": "format", "outputField": "name", "operation": "uppercase"}),
    );
    assert_eq!(result, json!({"name": "ANA"}));

    let result = run(
        json!({"name": "ana"}),
        json!({"type": "format", "field": "name", "outputField": "shout", "operation": "uppercase"}),
    );
    assert_eq!(result, json!({"name": "ana", "shout": "ANA"}));

    // Without any path the whole value is formatted
    assert_eq!(
        run(json!("12"), json!({"type": "format", "operation": "parse_number"})),
        json!(12)
    );
}

#[test]
fn test_format_missing_field_is_noop() {
    let data = json!({"other": 1});
    assert_eq!(
        run(data.clone(), json!({"type": "format", "field": "name", "operation": "uppercase"})),
        data
    );
}

#[test]
fn test_to_string_then_parse_number_roundtrip() {
    let data = json!({"n": 1234.5});
    let as_string = apply(&data, &built_in::to_string("n")).unwrap();
    assert_eq!(as_string, json!({"n": "1234.5"}));
    let back = apply(&as_string, &built_in::parse_number("n")).unwrap();
    assert_eq!(back, data);
}

// extract

#[test]
fn test_extract() {
    let data = json!({"user": {"name": "ana"}});
    assert_eq!(
        run(data.clone(), json!({"type": "extract", "field": "user.name", "outputField": "name"})),
        json!({"user": {"name": "ana"}, "name": "ana"})
    );
    assert_eq!(run(data.clone(), json!({"type": "extract", "field": "user.name"})), data);
    assert_eq!(
        run(data.clone(), json!({"type": "extract", "field": "user.age", "outputField": "age"})),
        data
    );
}

// aggregate

#[test]
fn test_aggregate_operations() {
    let data = json!([{"v": 1}, {"v": 2}, {"v": 3}]);
    let reduce = |operation: &str| {
        run(
            data.clone(),
            json!({"type": "aggregate", "operation": operation, "field": "v"}),
        )
    };
    assert_eq!(reduce("sum"), json!(6));
    assert_eq!(reduce("avg"), json!(2));
    assert_eq!(reduce("count"), json!(3));
    assert_eq!(reduce("max"), json!(3));
    assert_eq!(reduce("min"), json!(1));
}

#[test]
fn test_aggregate_edge_cases() {
    assert_eq!(run(json!([]), json!({"type": "aggregate", "operation": "sum"})), json!(0));
    assert_eq!(run(json!([2, 4.5]), json!({"type": "aggregate", "operation": "sum"})), json!(6.5));

    // No numbers: max is -inf, which JSON renders as null
    assert_eq!(
        run(json!(["a", "b"]), json!({"type": "aggregate", "operation": "max"})),
        Value::Null
    );

    let object = json!({"v": 1});
    assert_eq!(
        run(object.clone(), json!({"type": "aggregate", "operation": "sum"})),
        object
    );
    let list = json!([1, 2]);
    assert_eq!(
        run(list.clone(), json!({"type": "aggregate", "operation": "median"})),
        list
    );
}

// combine

#[test]
fn test_combine_operations() {
    let data = json!({"first": "Ada", "last": "Lovelace", "age": 36});
    let combine = |operation: &str| {
        run(
            data.clone(),
            json!({
                "type": "combine",
                "operation": operation,
                "value": ["first", "missing", "last"],
                "outputField": "out"
            }),
        )["out"]
            .clone()
    };
    assert_eq!(combine("concat"), json!("AdaLovelace"));
    assert_eq!(combine("array"), json!(["Ada", "Lovelace"]));
    assert_eq!(combine("object"), json!({"first": "Ada", "last": "Lovelace"}));
    assert_eq!(combine("zip"), json!(["Ada", "Lovelace"]));
}

#[test]
fn test_combine_without_output_field_is_noop() {
    let data = json!({"a": "x", "b": "y"});
    assert_eq!(
        run(data.clone(), json!({"type": "combine", "operation": "concat", "value": ["a", "b"]})),
        data
    );
}

#[test]
fn test_combine_requires_field_list() {
    let step = step_from(json!({"type": "combine", "value": "a", "outputField": "out"}));
    assert!(apply(&json!({"a": 1}), &step).is_err());
}

// conditional

#[test]
fn test_conditional_branches() {
    let step = json!({
        "type": "conditional",
        "condition": "age >= 18",
        "trueTransformation": {"type": "format", "field": "name", "operation": "uppercase"},
        "falseTransformation": {"type": "format", "field": "name", "operation": "lowercase"}
    });
    assert_eq!(
        run(json!({"name": "Ana", "age": 30}), step.clone()),
        json!({"name": "ANA", "age": 30})
    );
    assert_eq!(
        run(json!({"name": "Ana", "age": 12}), step),
        json!({"name": "ana", "age": 12})
    );
}

#[test]
fn test_conditional_without_branch_is_noop() {
    let data = json!({"age": 10});
    let step = json!({
        "type": "conditional",
        "condition": "age >= 18",
        "trueTransformation": {"type": "map", "field": "age", "outputField": "adultAge"}
    });
    assert_eq!(run(data.clone(), step), data);
}

#[test]
fn test_conditional_swallows_nested_errors() {
    let data = json!({"a": 1});
    let step = json!({
        "type": "conditional",
        "condition": "a == 1",
        "trueTransformation": {"type": "pivot"}
    });
    assert_eq!(run(data.clone(), step), data);
}

#[test]
fn test_continue_on_error_flag_overrides_default() {
    let strict = step_from(json!({
        "type": "conditional",
        "condition": "a == 1",
        "trueTransformation": {"type": "pivot"},
        "continueOnError": false
    }));
    assert!(apply(&json!({"a": 1}), &strict).is_err());

    let lenient = step_from(json!({"type": "pivot", "continueOnError": true}));
    assert_eq!(apply(&json!([1]), &lenient).unwrap(), json!([1]));
}

// loop

#[test]
fn test_loop_applies_item_steps_in_order() {
    let data = json!([{"name": " ana "}, {"name": "bo"}]);
    let step = json!({
        "type": "loop",
        "itemTransformations": [
            {"type": "format", "field": "name", "operation": "trim"},
            {"type": "format", "field": "name", "outputField": "label", "operation": "uppercase"}
        ]
    });
    assert_eq!(
        run(data, step),
        json!([{"name": "ana", "label": "ANA"}, {"name": "bo", "label": "BO"}])
    );
}

#[test]
fn test_loop_noop_cases() {
    let object = json!({"a": 1});
    let step = json!({"type": "loop", "itemTransformations": [{"type": "map", "field": "a", "outputField": "b"}]});
    assert_eq!(run(object.clone(), step), object);

    let list = json!([1, 2]);
    assert_eq!(run(list.clone(), json!({"type": "loop", "itemTransformations": []})), list);
    assert_eq!(run(list.clone(), json!({"type": "loop"})), list);
}

#[test]
fn test_loop_returns_original_array_on_error() {
    let data = json!([{"a": 1}, {"a": 2}]);
    let step = json!({
        "type": "loop",
        "itemTransformations": [
            {"type": "map", "field": "a", "outputField": "b"},
            {"type": "pivot"}
        ]
    });
    assert_eq!(run(data.clone(), step), data);
}

// sort

#[test]
fn test_sort_by_field() {
    let data = json!([{"n": "bob"}, {"n": "Alice"}, {"n": "carol"}]);
    assert_eq!(
        run(data.clone(), json!({"type": "sort", "field": "n"})),
        json!([{"n": "Alice"}, {"n": "bob"}, {"n": "carol"}])
    );
    assert_eq!(
        run(data, json!({"type": "sort", "field": "n", "operation": "DESC"})),
        json!([{"n": "carol"}, {"n": "bob"}, {"n": "Alice"}])
    );
}

#[test]
fn test_sort_direct_values() {
    assert_eq!(run(json!([10, 2, 33]), json!({"type": "sort"})), json!([2, 10, 33]));
    assert_eq!(
        run(json!([10, 2, 33]), json!({"type": "sort", "operation": "descending"})),
        json!([33, 10, 2])
    );
    assert_eq!(run(json!("abc"), json!({"type": "sort"})), json!("abc"));
}

#[test]
fn test_sort_is_stable() {
    let data = json!([{"k": 1, "id": "a"}, {"k": 0, "id": "b"}, {"k": 1, "id": "c"}]);
    assert_eq!(
        run(data, json!({"type": "sort", "field": "k"})),
        json!([{"k": 0, "id": "b"}, {"k": 1, "id": "a"}, {"k": 1, "id": "c"}])
    );
}

// value semantics

#[test]
fn test_steps_do_not_mutate_input() {
    let data = json!({"user": {"name": "ana"}, "items": [3, 1, 2]});
    let snapshot = data.clone();
    let steps = [
        built_in::rename("user.name", "user.alias"),
        built_in::uppercase("user.name"),
        built_in::sort_by("x"),
    ];
    for step in &steps {
        apply(&data, step).unwrap();
    }
    assert_eq!(data, snapshot);
}

#[test]
fn test_steps_are_reusable() {
    let step = TransformationStepBuilder::new(TransformationKind::Format)
        .field("v")
        .operation("uppercase")
        .build()
        .unwrap();
    assert_eq!(apply(&json!({"v": "a"}), &step).unwrap(), json!({"v": "A"}));
    assert_eq!(apply(&json!({"v": "b"}), &step).unwrap(), json!({"v": "B"}));
}

#[test]
fn test_write_through_scalar_fails_fast() {
    let step = built_in::rename("a", "name.first");
    assert!(apply(&json!({"a": 1, "name": "ana"}), &step).is_err());
}
