//! Step interpreter
//!
//! Applies one declarative [`TransformationStep`] to a JSON value and returns
//! the resulting value. The input is never modified; every step produces a new
//! value.
//!
//! Errors follow the step's error policy (see
//! [`TransformationStep::continues_on_error`]): a step that continues on error
//! logs the failure and returns its input unchanged, any other step propagates
//! it to the caller.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::coerce::{as_number, is_truthy, number_value, to_display_string, to_number};
use super::path::{get_path, set_path};
use super::types::{DeclaredKind, TransformationError, TransformationKind, TransformationStep};
use crate::condition::StepPredicate;
use crate::Result;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{trace, warn};

static NULL: Value = Value::Null;

/// Apply a single step to a value
pub fn apply(value: &Value, step: &TransformationStep) -> Result<Value> {
    match apply_kind(value, step) {
        Ok(result) => Ok(result),
        Err(e) if step.continues_on_error() => {
            warn!(step = %step, error = %e, "Transformation step failed, keeping its input");
            Ok(value.clone())
        }
        Err(e) => Err(e),
    }
}

impl TransformationStep {
    /// Apply this step to a value
    pub fn apply(&self, value: &Value) -> Result<Value> {
        apply(value, self)
    }
}

fn apply_kind(value: &Value, step: &TransformationStep) -> Result<Value> {
    let kind = match &step.kind {
        Some(DeclaredKind::Known(kind)) => *kind,
        Some(DeclaredKind::Unsupported(name)) => {
            return Err(TransformationError::UnsupportedKind { kind: name.clone() }.into())
        }
        None => return Err(TransformationError::MissingKind.into()),
    };

    trace!(step = %step, "Applying transformation step");

    match kind {
        TransformationKind::Map => map(value, step),
        TransformationKind::Filter => Ok(filter(value, step)),
        TransformationKind::Format => format(value, step),
        TransformationKind::Extract => extract(value, step),
        TransformationKind::Aggregate => Ok(aggregate_step(value, step)),
        TransformationKind::Combine => combine(value, step),
        TransformationKind::Conditional => conditional(value, step),
        TransformationKind::Loop => loop_items(value, step),
        TransformationKind::Sort => Ok(sort(value, step)),
    }
}

fn map(value: &Value, step: &TransformationStep) -> Result<Value> {
    let (Some(field), Some(output_field)) = (step.field.as_deref(), step.output_field.as_deref())
    else {
        return Ok(value.clone());
    };
    match get_path(value, field) {
        Some(source) => Ok(set_path(value, output_field, source.clone())?),
        None => Ok(value.clone()),
    }
}

fn filter(value: &Value, step: &TransformationStep) -> Value {
    if step.condition.is_none() && step.operation.is_none() {
        return value.clone();
    }
    let predicate = StepPredicate::from_step(step);
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|item| predicate.test(item))
                .cloned()
                .collect(),
        ),
        other if predicate.test(other) => other.clone(),
        _ => Value::Null,
    }
}

fn format(value: &Value, step: &TransformationStep) -> Result<Value> {
    let read_path = step.field.as_deref().or(step.output_field.as_deref());
    let write_path = step.output_field.as_deref().or(step.field.as_deref());

    let source = match read_path {
        Some(path) => match get_path(value, path) {
            Some(source) => source,
            None => return Ok(value.clone()),
        },
        None => value,
    };

    let formatted = format_value(source, step.operation.as_deref(), step.value.as_ref());
    match write_path {
        Some(path) => Ok(set_path(value, path, formatted)?),
        None => Ok(formatted),
    }
}

/// Apply a `format` operation to a single value
pub fn format_value(value: &Value, operation: Option<&str>, operand: Option<&Value>) -> Value {
    match operation.unwrap_or_default() {
        "uppercase" => Value::String(to_display_string(value).to_uppercase()),
        "lowercase" => Value::String(to_display_string(value).to_lowercase()),
        "trim" => Value::String(to_display_string(value).trim().to_string()),
        "title_case" => Value::String(title_case(&to_display_string(value))),
        "number" | "parse_number" => number_value(to_number(value)),
        "string" | "to_string" => Value::String(to_display_string(value)),
        "boolean" | "parse_boolean" => Value::Bool(match value {
            Value::String(s) => {
                let lowered = s.to_lowercase();
                lowered == "true" || lowered == "1"
            }
            other => is_truthy(other),
        }),
        "multiply" => match (as_number(value), operand.and_then(as_number)) {
            (Some(a), Some(b)) => number_value(a * b),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Capitalize the first letter of each whitespace-delimited word and
/// lowercase the rest; whitespace is preserved as is
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            word_start = true;
            result.push(c);
        } else if word_start {
            word_start = false;
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

fn extract(value: &Value, step: &TransformationStep) -> Result<Value> {
    let Some(extracted) = step.field.as_deref().and_then(|field| get_path(value, field)) else {
        return Ok(value.clone());
    };
    match step.output_field.as_deref() {
        Some(output_field) => Ok(set_path(value, output_field, extracted.clone())?),
        None => Ok(value.clone()),
    }
}

/// Reductions supported by `aggregate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOperation {
    Sum,
    Avg,
    Count,
    Max,
    Min,
}

impl FromStr for AggregateOperation {
    type Err = TransformationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggregateOperation::Sum),
            "avg" => Ok(AggregateOperation::Avg),
            "count" => Ok(AggregateOperation::Count),
            "max" => Ok(AggregateOperation::Max),
            "min" => Ok(AggregateOperation::Min),
            other => Err(TransformationError::Configuration {
                message: format!("Unknown aggregate operation '{}'", other),
                kind: Some(TransformationKind::Aggregate.to_string()),
            }),
        }
    }
}

/// Reduce a list of values
///
/// Only JSON numbers take part in `sum`, `avg`, `max` and `min`; `count`
/// counts every element. `max` and `min` of no numbers are `-inf` and `+inf`.
pub fn aggregate(values: &[&Value], operation: AggregateOperation) -> f64 {
    let numbers = values.iter().filter_map(|value| as_number(value));
    match operation {
        AggregateOperation::Sum => numbers.sum(),
        AggregateOperation::Avg => {
            let (total, count) = numbers.fold((0.0, 0usize), |(total, count), n| (total + n, count + 1));
            if count == 0 {
                0.0
            } else {
                total / count as f64
            }
        }
        AggregateOperation::Count => values.len() as f64,
        AggregateOperation::Max => numbers.fold(f64::NEG_INFINITY, f64::max),
        AggregateOperation::Min => numbers.fold(f64::INFINITY, f64::min),
    }
}

fn aggregate_step(value: &Value, step: &TransformationStep) -> Value {
    let Value::Array(items) = value else {
        return value.clone();
    };
    let Some(operation) = step
        .operation
        .as_deref()
        .and_then(|operation| operation.parse::<AggregateOperation>().ok())
    else {
        return value.clone();
    };

    let projected: Vec<&Value> = match step.field.as_deref() {
        Some(field) => items
            .iter()
            .map(|item| get_path(item, field).unwrap_or(&NULL))
            .collect(),
        None => items.iter().collect(),
    };

    number_value(aggregate(&projected, operation))
}

fn combine(value: &Value, step: &TransformationStep) -> Result<Value> {
    let Some(Value::Array(names)) = &step.value else {
        return Err(TransformationError::Configuration {
            message: "'value' must be an array of field names".to_string(),
            kind: Some(TransformationKind::Combine.to_string()),
        }
        .into());
    };

    let projected: Vec<(&str, &Value)> = names
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|name| get_path(value, name).map(|found| (name, found)))
        .collect();

    let combined = match step.operation.as_deref() {
        Some("concat") => Value::String(
            projected
                .iter()
                .map(|(_, found)| to_display_string(found))
                .collect::<String>(),
        ),
        Some("object") => Value::Object(
            projected
                .iter()
                .map(|(name, found)| (name.to_string(), (*found).clone()))
                .collect::<Map<String, Value>>(),
        ),
        _ => Value::Array(projected.iter().map(|(_, found)| (*found).clone()).collect()),
    };

    match step.output_field.as_deref() {
        Some(output_field) => Ok(set_path(value, output_field, combined)?),
        None => Ok(value.clone()),
    }
}

fn conditional(value: &Value, step: &TransformationStep) -> Result<Value> {
    let branch = if StepPredicate::from_step(step).test(value) {
        step.true_transformation.as_deref()
    } else {
        step.false_transformation.as_deref()
    };
    match branch {
        Some(nested) => apply(value, nested),
        None => Ok(value.clone()),
    }
}

fn loop_items(value: &Value, step: &TransformationStep) -> Result<Value> {
    let Value::Array(items) = value else {
        return Ok(value.clone());
    };
    let Some(item_steps) = step
        .item_transformations
        .as_deref()
        .filter(|steps| !steps.is_empty())
    else {
        return Ok(value.clone());
    };

    let transformed = items
        .iter()
        .map(|item| {
            item_steps
                .iter()
                .try_fold(item.clone(), |current, item_step| apply(&current, item_step))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(transformed))
}

/// Ordering key for `sort`
#[derive(Debug, PartialEq)]
enum SortKey {
    /// Numbers, booleans and null compare numerically
    Numeric(f64),
    /// Strings compare case-insensitively
    Text(String),
    /// Arrays and objects compare by their lowercased string form
    Composite(String),
    Missing,
}

impl SortKey {
    fn of(item: &Value, field: Option<&str>) -> Self {
        let target = match field {
            Some(path) => get_path(item, path),
            None => Some(item),
        };
        match target {
            None => SortKey::Missing,
            Some(Value::String(s)) => SortKey::Text(s.to_lowercase()),
            Some(composite @ (Value::Array(_) | Value::Object(_))) => {
                SortKey::Composite(to_display_string(composite).to_lowercase())
            }
            Some(scalar) => SortKey::Numeric(to_number(scalar)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Numeric(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Composite(_) => 2,
            SortKey::Missing => 3,
        }
    }

    fn cmp_present(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(a), SortKey::Numeric(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) | (SortKey::Composite(a), SortKey::Composite(b)) => {
                a.cmp(b)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort(value: &Value, step: &TransformationStep) -> Value {
    let Value::Array(items) = value else {
        return value.clone();
    };
    let descending = step
        .operation
        .as_deref()
        .map(|operation| {
            operation.eq_ignore_ascii_case("desc") || operation.eq_ignore_ascii_case("descending")
        })
        .unwrap_or(false);
    let field = step.field.as_deref();

    let mut keyed: Vec<(SortKey, &Value)> = items
        .iter()
        .map(|item| (SortKey::of(item, field), item))
        .collect();

    // Stable sort; missing keys stay last in both directions
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        _ if descending => a.cmp_present(b).reverse(),
        _ => a.cmp_present(b),
    });

    Value::Array(keyed.into_iter().map(|(_, item)| item.clone()).collect())
}
