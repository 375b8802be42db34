//! Builder for creating transformation steps
//!
//! This module provides a fluent builder API for constructing transformation
//! steps, with a `build` that checks the configuration each kind relies on.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use super::types::{DeclaredKind, TransformationError, TransformationKind, TransformationStep};
use serde_json::Value;

/// Builder for creating transformation steps
#[derive(Debug, Clone, Default)]
pub struct TransformationStepBuilder {
    kind: Option<TransformationKind>,
    field: Option<String>,
    output_field: Option<String>,
    operation: Option<String>,
    value: Option<Value>,
    condition: Option<String>,
    true_transformation: Option<TransformationStep>,
    false_transformation: Option<TransformationStep>,
    item_transformations: Vec<TransformationStep>,
    continue_on_error: Option<bool>,
}

impl TransformationStepBuilder {
    /// Create a new step builder
    pub fn new(kind: TransformationKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Set the path read by the step
    pub fn field(mut self, path: impl Into<String>) -> Self {
        self.field = Some(path.into());
        self
    }

    /// Set the path written by the step
    pub fn output_field(mut self, path: impl Into<String>) -> Self {
        self.output_field = Some(path.into());
        self
    }

    /// Set the operation
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set the literal operand
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the condition expression
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Step applied when the condition holds
    pub fn when_true(mut self, step: TransformationStep) -> Self {
        self.true_transformation = Some(step);
        self
    }

    /// Step applied when the condition does not hold
    pub fn when_false(mut self, step: TransformationStep) -> Self {
        self.false_transformation = Some(step);
        self
    }

    /// Append a step applied to every element
    pub fn item_step(mut self, step: TransformationStep) -> Self {
        self.item_transformations.push(step);
        self
    }

    /// Append several per-element steps
    pub fn item_steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = TransformationStep>,
    {
        self.item_transformations.extend(steps);
        self
    }

    /// Override the kind's default error policy
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = Some(continue_on_error);
        self
    }

    /// Build the transformation step
    pub fn build(self) -> Result<TransformationStep> {
        let kind = self.kind.ok_or(TransformationError::MissingKind)?;

        let missing = |what: &str| TransformationError::Configuration {
            message: format!("'{}' is required for {} steps", what, kind),
            kind: Some(kind.to_string()),
        };

        match kind {
            TransformationKind::Map if self.field.is_none() => return Err(missing("field").into()),
            TransformationKind::Map if self.output_field.is_none() => {
                return Err(missing("outputField").into())
            }
            TransformationKind::Filter if self.condition.is_none() && self.operation.is_none() => {
                return Err(missing("condition or operation").into())
            }
            TransformationKind::Format | TransformationKind::Aggregate
                if self.operation.is_none() =>
            {
                return Err(missing("operation").into())
            }
            TransformationKind::Extract if self.field.is_none() => {
                return Err(missing("field").into())
            }
            TransformationKind::Combine if !matches!(self.value, Some(Value::Array(_))) => {
                return Err(missing("value (array of field names)").into())
            }
            TransformationKind::Conditional if self.condition.is_none() => {
                return Err(missing("condition").into())
            }
            TransformationKind::Loop if self.item_transformations.is_empty() => {
                return Err(missing("itemTransformations").into())
            }
            _ => {}
        }

        Ok(TransformationStep {
            kind: Some(DeclaredKind::Known(kind)),
            field: self.field,
            output_field: self.output_field,
            operation: self.operation,
            value: self.value,
            condition: self.condition,
            true_transformation: self.true_transformation.map(Box::new),
            false_transformation: self.false_transformation.map(Box::new),
            item_transformations: if self.item_transformations.is_empty() {
                None
            } else {
                Some(self.item_transformations)
            },
            continue_on_error: self.continue_on_error,
        })
    }
}
