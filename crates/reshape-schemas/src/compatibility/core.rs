//! Compatibility analysis between two schema nodes
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::types::{
    CompatibilityIssue, CompatibilityReport, IssueType, Suggestion, SuggestionType,
};
use crate::inference::{SchemaNode, SchemaType};
use reshape_core::{built_in, Severity};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Penalty for a top-level type difference a format step can bridge
pub const CONVERTIBLE_PENALTY: f64 = 0.2;
/// Penalty for a top-level type difference nothing can bridge
pub const INCOMPATIBLE_PENALTY: f64 = 0.5;
/// Penalty per required target property missing from the source
pub const MISSING_REQUIRED_PENALTY: f64 = 0.3;
/// Penalty per optional target property missing from the source
pub const MISSING_OPTIONAL_PENALTY: f64 = 0.1;

/// Whether a value of type `from` can be formatted into type `to`
pub fn is_convertible(from: SchemaType, to: SchemaType) -> bool {
    use SchemaType::*;
    matches!(
        (from, to),
        (String, Number)
            | (String, Boolean)
            | (String, Object)
            | (Number, String)
            | (Number, Boolean)
            | (Boolean, String)
            | (Boolean, Number)
            | (Object, String)
    )
}

/// The `format` operation that converts `from` into `to`
///
/// Pairs without a dedicated operation map to `identity`, which leaves the
/// value untouched.
pub fn conversion_operation(from: SchemaType, to: SchemaType) -> &'static str {
    use SchemaType::*;
    match (from, to) {
        (String, Number) | (Boolean, Number) => "parse_number",
        (String, Boolean) | (Number, Boolean) => "parse_boolean",
        (Number, String) | (Boolean, String) => "to_string",
        _ => "identity",
    }
}

fn conversion_suggestion(from: SchemaType, to: SchemaType) -> Suggestion {
    let operation = conversion_operation(from, to);
    Suggestion {
        id: format!("type-conversion-{}-{}", from, to),
        suggestion_type: SuggestionType::TypeConversion,
        confidence: if operation == "identity" { 0.5 } else { 0.9 },
        description: format!("Convert {} to {} using '{}'", from, to, operation),
        transformation: built_in::format(None, operation),
    }
}

/// Compare a source schema against the target it must feed
#[instrument(skip_all, fields(source = %source.schema_type, target = %target.schema_type))]
pub fn analyze_compatibility(source: &SchemaNode, target: &SchemaNode) -> CompatibilityReport {
    let mut score = 1.0;
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if source.schema_type != target.schema_type {
        let (from, to) = (source.schema_type, target.schema_type);
        if is_convertible(from, to) {
            score -= CONVERTIBLE_PENALTY;
            issues.push(CompatibilityIssue::new(
                IssueType::TypeMismatch,
                Severity::Warning,
                format!("Type mismatch: {} can be converted to {}", from, to),
            ));
            suggestions.push(conversion_suggestion(from, to));
        } else {
            score -= INCOMPATIBLE_PENALTY;
            issues.push(CompatibilityIssue::new(
                IssueType::TypeMismatch,
                Severity::Error,
                format!("Type mismatch: {} cannot be converted to {}", from, to),
            ));
        }
    }

    if source.schema_type == SchemaType::Object && target.schema_type == SchemaType::Object {
        for (name, property) in target.properties.iter().flatten() {
            if source.property(name).is_some() {
                continue;
            }
            let (penalty, severity, label) = if property.required {
                (MISSING_REQUIRED_PENALTY, Severity::Error, "required")
            } else {
                (MISSING_OPTIONAL_PENALTY, Severity::Warning, "optional")
            };
            score -= penalty;
            issues.push(
                CompatibilityIssue::new(
                    IssueType::MissingField,
                    severity,
                    format!("Missing {} field '{}'", label, name),
                )
                .with_field(name.as_str()),
            );
        }
    }

    let report = CompatibilityReport::from_parts(score, issues, suggestions);
    debug!(
        score = report.score,
        compatible = report.compatible,
        issues = report.issues.len(),
        "Analyzed compatibility"
    );
    report
}

/// Compare two schemas given in their JSON form
///
/// A side that does not parse as a schema node yields a failed report with a
/// single error issue.
pub fn analyze_compatibility_json(source: &Value, target: &Value) -> CompatibilityReport {
    let parsed = SchemaNode::from_value(source)
        .and_then(|source| SchemaNode::from_value(target).map(|target| (source, target)));
    match parsed {
        Ok((source, target)) => analyze_compatibility(&source, &target),
        Err(e) => {
            warn!(error = %e, "Compatibility analysis failed");
            CompatibilityReport::failure(format!("Compatibility analysis failed: {}", e))
        }
    }
}
