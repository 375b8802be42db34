//! Compatibility report types
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use reshape_core::{Severity, TransformationStep};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a compatibility issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// Source and target disagree on the top-level type
    TypeMismatch,
    /// The target declares a property the source lacks
    MissingField,
    /// The analysis itself could not run
    AnalysisFailed,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::TypeMismatch => write!(f, "type-mismatch"),
            IssueType::MissingField => write!(f, "missing-field"),
            IssueType::AnalysisFailed => write!(f, "analysis-failed"),
        }
    }
}

/// A single finding of a compatibility analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    /// The property the issue refers to, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl CompatibilityIssue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for CompatibilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.issue_type, self.message)
    }
}

/// Kind of fix a suggestion proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionType {
    TypeConversion,
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionType::TypeConversion => write!(f, "type-conversion"),
        }
    }
}

/// A transformation step that would fix an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub confidence: f64,
    pub description: String,
    pub transformation: TransformationStep,
}

/// Result of comparing a source schema against a target schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub compatible: bool,
    /// Score in `[0, 1]`; compatible when above 0.5
    pub score: f64,
    pub issues: Vec<CompatibilityIssue>,
    pub suggestions: Vec<Suggestion>,
    pub auto_fixable: bool,
}

impl CompatibilityReport {
    /// Assemble a report, deriving the verdict from the raw score
    pub fn from_parts(
        raw_score: f64,
        issues: Vec<CompatibilityIssue>,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        let score = raw_score.clamp(0.0, 1.0);
        Self {
            compatible: score > 0.5,
            score,
            auto_fixable: !suggestions.is_empty(),
            issues,
            suggestions,
        }
    }

    /// The report returned when analysis could not run
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            compatible: false,
            score: 0.0,
            issues: vec![CompatibilityIssue::new(
                IssueType::AnalysisFailed,
                Severity::Error,
                message,
            )],
            suggestions: Vec::new(),
            auto_fixable: false,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompatibilityIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompatibilityIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}
