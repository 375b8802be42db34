//! Core validation types and enums
//!
//! This module contains the types produced by pipeline validation: per-step
//! issues, the aggregated report, and the validation mode.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A problem found in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// 1-based step position; 0 refers to the pipeline as a whole
    pub step: usize,
    /// Step property the issue is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(step: usize, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            step,
            field: field.map(str::to_string),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(step: usize, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            step,
            field: field.map(str::to_string),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {}", self.step, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        Ok(())
    }
}

/// Result of validating a pipeline definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff `errors` is empty
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub total_transformations: usize,
}

impl ValidationReport {
    /// Assemble a report; validity is derived from the errors
    pub fn new(
        errors: Vec<ValidationIssue>,
        warnings: Vec<ValidationIssue>,
        total_transformations: usize,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            total_transformations,
        }
    }

    /// Errors and warnings in step order
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        let mut all: Vec<&ValidationIssue> = self.errors.iter().chain(&self.warnings).collect();
        all.sort_by_key(|issue| issue.step);
        all.into_iter()
    }
}

/// Validation mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Warnings are reported as errors
    Strict,
    /// Warnings never block validity
    #[default]
    Lenient,
}
