//! Core types for the transformation system
//!
//! This module defines the declarative step model: the closed set of
//! transformation kinds, the step description itself, and the errors raised
//! while interpreting steps.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while applying a transformation step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformationError {
    /// The step declares a kind outside the supported set
    #[error("Unsupported transformation type: {kind}")]
    UnsupportedKind { kind: String },

    /// The step does not declare a kind at all
    #[error("Transformation type is required")]
    MissingKind,

    /// A write path runs through a value that cannot hold fields
    #[error("Cannot write to '{path}': {message}")]
    PathConflict { path: String, message: String },

    /// Invalid step configuration
    #[error("Invalid transformation configuration: {message}")]
    Configuration {
        message: String,
        kind: Option<String>,
    },
}

impl From<TransformationError> for crate::Error {
    fn from(err: TransformationError) -> Self {
        crate::Error::Transformation {
            message: err.to_string(),
            context: Some("Step Interpreter".to_string()),
        }
    }
}

/// The closed set of transformation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationKind {
    Map,
    Filter,
    Format,
    Extract,
    Aggregate,
    Combine,
    Conditional,
    Loop,
    Sort,
}

impl TransformationKind {
    /// Every supported kind, in declaration order
    pub const ALL: [TransformationKind; 9] = [
        TransformationKind::Map,
        TransformationKind::Filter,
        TransformationKind::Format,
        TransformationKind::Extract,
        TransformationKind::Aggregate,
        TransformationKind::Combine,
        TransformationKind::Conditional,
        TransformationKind::Loop,
        TransformationKind::Sort,
    ];

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationKind::Map => "map",
            TransformationKind::Filter => "filter",
            TransformationKind::Format => "format",
            TransformationKind::Extract => "extract",
            TransformationKind::Aggregate => "aggregate",
            TransformationKind::Combine => "combine",
            TransformationKind::Conditional => "conditional",
            TransformationKind::Loop => "loop",
            TransformationKind::Sort => "sort",
        }
    }

    /// Whether errors inside this kind are swallowed when the step does not say otherwise
    pub fn continues_on_error_by_default(&self) -> bool {
        matches!(self, TransformationKind::Conditional | TransformationKind::Loop)
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationKind {
    type Err = TransformationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TransformationError::UnsupportedKind { kind: s.to_string() })
    }
}

/// The kind a step declares on the wire
///
/// Names outside the closed set are kept verbatim so that the error surfaces
/// when the step is applied rather than when the pipeline is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredKind {
    Known(TransformationKind),
    Unsupported(String),
}

impl DeclaredKind {
    /// The supported kind, if any
    pub fn known(&self) -> Option<TransformationKind> {
        match self {
            DeclaredKind::Known(kind) => Some(*kind),
            DeclaredKind::Unsupported(_) => None,
        }
    }

    /// Declared name as written
    pub fn name(&self) -> &str {
        match self {
            DeclaredKind::Known(kind) => kind.as_str(),
            DeclaredKind::Unsupported(name) => name,
        }
    }
}

impl From<TransformationKind> for DeclaredKind {
    fn from(kind: TransformationKind) -> Self {
        DeclaredKind::Known(kind)
    }
}

/// A single declarative transformation step
///
/// Steps are pure descriptions: they hold no runtime state and can be reused
/// across any number of pipeline runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationStep {
    /// Kind of transformation (`type` on the wire, `kind` accepted as an alias)
    #[serde(rename = "type", alias = "kind", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeclaredKind>,
    /// Dot-separated path read by the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Dot-separated path written by the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_field: Option<String>,
    /// Sub-behavior selector for the kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Literal operand; an explicit `null` is kept as `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    /// Free-form boolean expression over field names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Applied by `conditional` when the condition holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_transformation: Option<Box<TransformationStep>>,
    /// Applied by `conditional` when the condition does not hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_transformation: Option<Box<TransformationStep>>,
    /// Applied in order to every element by `loop`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_transformations: Option<Vec<TransformationStep>>,
    /// Overrides the kind's default error policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TransformationStep {
    /// Create an empty step of the given kind
    pub fn new(kind: TransformationKind) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// The supported kind of this step, if it declares one
    pub fn known_kind(&self) -> Option<TransformationKind> {
        self.kind.as_ref().and_then(DeclaredKind::known)
    }

    /// Declared kind name, `undefined` when absent
    pub fn kind_name(&self) -> &str {
        self.kind.as_ref().map(DeclaredKind::name).unwrap_or("undefined")
    }

    /// Effective error policy for this step
    pub fn continues_on_error(&self) -> bool {
        self.continue_on_error.unwrap_or_else(|| {
            self.known_kind()
                .map(|kind| kind.continues_on_error_by_default())
                .unwrap_or(false)
        })
    }

    /// Nesting depth of this step (1 for a step without nested steps)
    pub fn depth(&self) -> usize {
        let branch_depth = [&self.true_transformation, &self.false_transformation]
            .into_iter()
            .flatten()
            .map(|nested| nested.depth())
            .max()
            .unwrap_or(0);
        let item_depth = self
            .item_transformations
            .iter()
            .flatten()
            .map(TransformationStep::depth)
            .max()
            .unwrap_or(0);
        1 + branch_depth.max(item_depth)
    }
}

impl fmt::Display for TransformationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind_name())?;
        let mut details = Vec::new();
        if let Some(operation) = &self.operation {
            details.push(format!("operation={}", operation));
        }
        if let Some(field) = &self.field {
            details.push(format!("field={}", field));
        }
        if let Some(output_field) = &self.output_field {
            details.push(format!("outputField={}", output_field));
        }
        if let Some(condition) = &self.condition {
            details.push(format!("condition={:?}", condition));
        }
        if !details.is_empty() {
            write!(f, "({})", details.join(", "))?;
        }
        Ok(())
    }
}
