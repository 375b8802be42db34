//! Built-in steps for common operations
//!
//! Pre-configured transformation steps for field copies, type conversions,
//! text formatting and reductions. The compatibility analyzer uses these to
//! build its fix suggestions.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::types::{TransformationKind, TransformationStep};
use serde_json::Value;

fn format_step(field: Option<&str>, operation: &str) -> TransformationStep {
    TransformationStep {
        field: field.map(str::to_string),
        operation: Some(operation.to_string()),
        ..TransformationStep::new(TransformationKind::Format)
    }
}

/// Copy the value at `from` to `to`
pub fn rename(from: impl Into<String>, to: impl Into<String>) -> TransformationStep {
    TransformationStep {
        field: Some(from.into()),
        output_field: Some(to.into()),
        ..TransformationStep::new(TransformationKind::Map)
    }
}

/// Extract the value at `from` into `to`
pub fn extract(from: impl Into<String>, to: impl Into<String>) -> TransformationStep {
    TransformationStep {
        field: Some(from.into()),
        output_field: Some(to.into()),
        ..TransformationStep::new(TransformationKind::Extract)
    }
}

/// Format with an arbitrary operation; `None` formats the whole value
pub fn format(field: Option<&str>, operation: &str) -> TransformationStep {
    format_step(field, operation)
}

/// Uppercase the string at `field`
pub fn uppercase(field: &str) -> TransformationStep {
    format_step(Some(field), "uppercase")
}

/// Lowercase the string at `field`
pub fn lowercase(field: &str) -> TransformationStep {
    format_step(Some(field), "lowercase")
}

/// Trim surrounding whitespace at `field`
pub fn trim(field: &str) -> TransformationStep {
    format_step(Some(field), "trim")
}

/// Parse the value at `field` as a number
pub fn parse_number(field: &str) -> TransformationStep {
    format_step(Some(field), "parse_number")
}

/// Parse the value at `field` as a boolean
pub fn parse_boolean(field: &str) -> TransformationStep {
    format_step(Some(field), "parse_boolean")
}

/// Render the value at `field` as a string
pub fn to_string(field: &str) -> TransformationStep {
    format_step(Some(field), "to_string")
}

/// Multiply the number at `field` by `factor`
pub fn multiply(field: &str, factor: f64) -> TransformationStep {
    TransformationStep {
        value: Some(Value::from(factor)),
        ..format_step(Some(field), "multiply")
    }
}

/// Keep items for which `condition` holds
pub fn filter_where(condition: impl Into<String>) -> TransformationStep {
    TransformationStep {
        condition: Some(condition.into()),
        ..TransformationStep::new(TransformationKind::Filter)
    }
}

fn aggregate(operation: &str, field: Option<&str>) -> TransformationStep {
    TransformationStep {
        field: field.map(str::to_string),
        operation: Some(operation.to_string()),
        ..TransformationStep::new(TransformationKind::Aggregate)
    }
}

/// Sum of the numbers (optionally at `field` of each element)
pub fn sum(field: Option<&str>) -> TransformationStep {
    aggregate("sum", field)
}

/// Mean of the numbers (optionally at `field` of each element)
pub fn average(field: Option<&str>) -> TransformationStep {
    aggregate("avg", field)
}

/// Number of elements
pub fn count() -> TransformationStep {
    aggregate("count", None)
}

/// Sort ascending by `field`
pub fn sort_by(field: impl Into<String>) -> TransformationStep {
    TransformationStep {
        field: Some(field.into()),
        operation: Some("asc".to_string()),
        ..TransformationStep::new(TransformationKind::Sort)
    }
}

/// Sort descending by `field`
pub fn sort_by_desc(field: impl Into<String>) -> TransformationStep {
    TransformationStep {
        operation: Some("desc".to_string()),
        ..sort_by(field)
    }
}

/// Concatenate the strings at `fields` into `output_field`
pub fn concat<I, S>(fields: I, output_field: impl Into<String>) -> TransformationStep
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TransformationStep {
        value: Some(Value::Array(
            fields.into_iter().map(|field| Value::String(field.into())).collect(),
        )),
        output_field: Some(output_field.into()),
        operation: Some("concat".to_string()),
        ..TransformationStep::new(TransformationKind::Combine)
    }
}
