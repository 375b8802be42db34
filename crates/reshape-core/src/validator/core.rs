//! Structural validation of pipeline definitions
//!
//! Validation never executes a step. It checks that every step declares a
//! supported kind and carries the properties that kind relies on: missing
//! required properties are errors, missing recommended ones are warnings.
//! Nested steps are not validated.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::types::{ValidationIssue, ValidationMode, ValidationReport};
use crate::condition::Condition;
use crate::transform::{DeclaredKind, TransformationKind, TransformationStep};
use crate::Severity;
use serde_json::Value;
use tracing::debug;

/// Validator for transformation step lists
#[derive(Debug, Clone, Copy, Default)]
pub struct StepValidator {
    mode: ValidationMode,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

impl StepValidator {
    /// Create a validator in lenient mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with an explicit mode
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate a list of steps
    pub fn validate(&self, steps: &[TransformationStep]) -> ValidationReport {
        let issues: Vec<ValidationIssue> = steps
            .iter()
            .enumerate()
            .flat_map(|(index, step)| validate_step(index + 1, step))
            .collect();
        self.report(issues, steps.len())
    }

    /// Validate a raw JSON step list
    ///
    /// Anything that is not an array is a single pipeline-level error; elements
    /// that do not deserialize as steps are errors for their position.
    pub fn validate_json(&self, transformations: &Value) -> ValidationReport {
        let Value::Array(items) = transformations else {
            return self.report(
                vec![ValidationIssue::error(0, None, "Transformations must be an array")],
                0,
            );
        };

        let issues: Vec<ValidationIssue> = items
            .iter()
            .enumerate()
            .flat_map(|(index, item)| {
                match serde_json::from_value::<TransformationStep>(item.clone()) {
                    Ok(step) => validate_step(index + 1, &step),
                    Err(e) => vec![ValidationIssue::error(
                        index + 1,
                        None,
                        format!("Invalid transformation: {}", e),
                    )],
                }
            })
            .collect();
        self.report(issues, items.len())
    }

    fn report(&self, issues: Vec<ValidationIssue>, total: usize) -> ValidationReport {
        let (errors, warnings): (Vec<_>, Vec<_>) = issues
            .into_iter()
            .map(|mut issue| {
                if self.mode == ValidationMode::Strict {
                    issue.severity = Severity::Error;
                }
                issue
            })
            .partition(|issue| issue.severity == Severity::Error);

        debug!(
            errors = errors.len(),
            warnings = warnings.len(),
            total,
            "Validated transformations"
        );
        ValidationReport::new(errors, warnings, total)
    }
}

fn validate_step(step_number: usize, step: &TransformationStep) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let error = |field: &str, message: &str| ValidationIssue::error(step_number, Some(field), message);
    let warning =
        |field: &str, message: &str| ValidationIssue::warning(step_number, Some(field), message);

    let kind = match &step.kind {
        Some(DeclaredKind::Known(kind)) => *kind,
        Some(DeclaredKind::Unsupported(name)) => {
            issues.push(error("type", &format!("Unsupported transformation type: {}", name)));
            return issues;
        }
        None => {
            issues.push(error("type", "Transformation type is required"));
            return issues;
        }
    };

    match kind {
        TransformationKind::Map => {
            if !present(&step.field) {
                issues.push(error("field", "Map transformation requires a source field"));
            }
            if !present(&step.output_field) {
                issues.push(error("outputField", "Map transformation requires an output field"));
            }
        }
        TransformationKind::Filter => {
            if !present(&step.condition) && !present(&step.operation) {
                issues.push(error(
                    "condition",
                    "Filter transformation requires a condition or an operation",
                ));
            }
        }
        TransformationKind::Format => {
            if !present(&step.operation) {
                issues.push(error("operation", "Format transformation requires an operation"));
            }
            if !present(&step.field) && !present(&step.output_field) {
                issues.push(warning(
                    "field",
                    "Format transformation has no field or output field, the whole value is formatted",
                ));
            }
        }
        TransformationKind::Extract => {
            if !present(&step.field) {
                issues.push(error("field", "Extract transformation requires a source field"));
            }
        }
        TransformationKind::Aggregate => {
            if !present(&step.operation) {
                issues.push(error("operation", "Aggregate transformation requires an operation"));
            }
        }
        TransformationKind::Combine => {
            if !matches!(step.value, Some(Value::Array(_))) {
                issues.push(error(
                    "value",
                    "Combine transformation requires an array of field names",
                ));
            }
        }
        TransformationKind::Conditional => {
            if !present(&step.condition) {
                issues.push(error("condition", "Conditional transformation requires a condition"));
            }
        }
        TransformationKind::Loop => {
            if step.item_transformations.is_none() {
                issues.push(error(
                    "itemTransformations",
                    "Loop transformation requires item transformations",
                ));
            }
        }
        TransformationKind::Sort => {
            if !present(&step.operation) {
                issues.push(warning(
                    "operation",
                    "Sort direction not specified, defaulting to ascending",
                ));
            }
        }
    }

    if matches!(kind, TransformationKind::Filter | TransformationKind::Conditional) {
        if let Some(source) = step.condition.as_deref().filter(|c| !c.trim().is_empty()) {
            if let Err(e) = Condition::parse(source) {
                issues.push(warning(
                    "condition",
                    &format!("Condition will always evaluate to false: {}", e),
                ));
            }
        }
    }

    issues
}

/// Validate a list of steps in lenient mode
pub fn validate_transformations(transformations: &[TransformationStep]) -> ValidationReport {
    StepValidator::new().validate(transformations)
}

/// Validate a raw JSON step list in lenient mode
pub fn validate_transformations_json(transformations: &Value) -> ValidationReport {
    StepValidator::new().validate_json(transformations)
}
