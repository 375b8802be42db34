//! Step predicates for `filter` and `conditional`
//!
//! A step selects items either with a free-form `condition` expression or
//! with a structured `operation` (`exists`, `equals`, `not_equals`,
//! `greater_than`, `less_than`, `contains`) applied to `field` and `value`.
//! A step with neither always passes.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::{Condition, ConditionError, Operand};
use crate::transform::path::get_path;
use crate::transform::types::TransformationStep;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

/// A step's selection rule, compiled once and evaluated per item
#[derive(Debug, Clone)]
pub enum StepPredicate<'a> {
    /// No condition and no operation
    Always,
    /// Free-form condition; a parse failure makes every item fail
    Expression(Result<Condition, ConditionError>),
    /// Structured operation over an optional field
    Structured {
        operation: &'a str,
        field: Option<&'a str>,
        value: Option<&'a Value>,
    },
}

impl<'a> StepPredicate<'a> {
    /// Compile the predicate a step describes
    pub fn from_step(step: &'a TransformationStep) -> Self {
        if let Some(condition) = step.condition.as_deref().filter(|c| !c.trim().is_empty()) {
            return StepPredicate::Expression(Condition::parse(condition));
        }
        match step.operation.as_deref() {
            Some(operation) => StepPredicate::Structured {
                operation,
                field: step.field.as_deref(),
                value: step.value.as_ref(),
            },
            None => StepPredicate::Always,
        }
    }

    /// Whether the item is selected
    pub fn test(&self, item: &Value) -> bool {
        match self {
            StepPredicate::Always => true,
            StepPredicate::Expression(Ok(condition)) => condition.matches(item),
            StepPredicate::Expression(Err(e)) => {
                debug!(error = %e, "Condition rejected at parse time");
                false
            }
            StepPredicate::Structured {
                operation,
                field,
                value,
            } => {
                let subject = match field {
                    Some(path) => get_path(item, path),
                    None => Some(item),
                };
                structured_test(operation, subject, *value)
            }
        }
    }
}

fn structured_test(operation: &str, subject: Option<&Value>, value: Option<&Value>) -> bool {
    let subject_operand = subject.map(Operand::from_value).unwrap_or(Operand::Undefined);
    let value_operand = value.map(Operand::from_value).unwrap_or(Operand::Undefined);

    match operation {
        "exists" => !matches!(subject_operand, Operand::Undefined | Operand::Null),
        "equals" => subject_operand.strict_equals(&value_operand),
        "not_equals" => !subject_operand.strict_equals(&value_operand),
        "greater_than" => subject_operand.compare(&value_operand) == Some(Ordering::Greater),
        "less_than" => subject_operand.compare(&value_operand) == Some(Ordering::Less),
        "contains" => match subject {
            Some(Value::String(haystack)) => {
                haystack.contains(value_operand.to_display_string().as_str())
            }
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| Operand::from_value(item).strict_equals(&value_operand)),
            _ => false,
        },
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::types::TransformationKind;
    use serde_json::json;

    fn structured(operation: &str, field: Option<&str>, value: Option<Value>) -> TransformationStep {
        TransformationStep {
            operation: Some(operation.to_string()),
            field: field.map(str::to_string),
            value,
            ..TransformationStep::new(TransformationKind::Filter)
        }
    }

    #[test]
    fn test_absent_condition_always_passes() {
        let step = TransformationStep::new(TransformationKind::Filter);
        assert!(StepPredicate::from_step(&step).test(&json!(null)));

        let blank = TransformationStep {
            condition: Some("  ".to_string()),
            ..step
        };
        assert!(StepPredicate::from_step(&blank).test(&json!({})));
    }

    #[test]
    fn test_condition_takes_precedence() {
        let step = TransformationStep {
            condition: Some("age > 30".to_string()),
            ..structured("exists", Some("age"), None)
        };
        let predicate = StepPredicate::from_step(&step);
        assert!(!predicate.test(&json!({"age": 20})));
        assert!(predicate.test(&json!({"age": 40})));
    }

    #[test]
    fn test_invalid_condition_fails_every_item() {
        let step = TransformationStep {
            condition: Some("age >>> 3".to_string()),
            ..TransformationStep::new(TransformationKind::Filter)
        };
        assert!(!StepPredicate::from_step(&step).test(&json!({"age": 4})));
    }

    #[test]
    fn test_structured_operations() {
        let item = json!({"age": 25, "name": "Ana Maria", "tags": ["x", "y"], "gone": null});

        let check = |step: TransformationStep| StepPredicate::from_step(&step).test(&item);

        assert!(check(structured("exists", Some("age"), None)));
        assert!(!check(structured("exists", Some("gone"), None)));
        assert!(!check(structured("exists", Some("nope"), None)));
        assert!(check(structured("equals", Some("age"), Some(json!(25)))));
        assert!(!check(structured("equals", Some("age"), Some(json!("25")))));
        assert!(check(structured("not_equals", Some("age"), Some(json!("25")))));
        assert!(check(structured("greater_than", Some("age"), Some(json!(18)))));
        assert!(!check(structured("less_than", Some("age"), Some(json!(18)))));
        assert!(check(structured("contains", Some("name"), Some(json!("Maria")))));
        assert!(check(structured("contains", Some("tags"), Some(json!("y")))));
        assert!(!check(structured("contains", Some("age"), Some(json!(2)))));
        assert!(check(structured("matches_somehow", Some("age"), None)));
    }

    #[test]
    fn test_structured_without_field_tests_item() {
        let step = structured("greater_than", None, Some(json!(5)));
        let predicate = StepPredicate::from_step(&step);
        assert!(predicate.test(&json!(7)));
        assert!(!predicate.test(&json!(3)));
    }
}
