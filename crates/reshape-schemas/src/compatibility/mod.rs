//! Structural compatibility analysis with fix suggestions
//!
//! The score starts at 1.0 and loses a fixed penalty per finding: 0.2 for a
//! convertible top-level type difference, 0.5 for an unbridgeable one, and
//! 0.3 or 0.1 for each required or optional target property the source lacks.
//! Convertible differences come with a `format` step that performs the
//! conversion.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

mod core;
pub mod types;

pub use self::core::{
    analyze_compatibility, analyze_compatibility_json, conversion_operation, is_convertible,
    CONVERTIBLE_PENALTY, INCOMPATIBLE_PENALTY, MISSING_OPTIONAL_PENALTY, MISSING_REQUIRED_PENALTY,
};
pub use types::{CompatibilityIssue, CompatibilityReport, IssueType, Suggestion, SuggestionType};
