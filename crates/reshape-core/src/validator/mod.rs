//! Pipeline validation
//!
//! The validator is organized into focused modules:
//! - `types`: Issues, reports and the validation mode
//! - `core`: The step validator and per-kind rules
//! - `tests`: Test suite
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod core;


// Re-export public API
pub use types::{ValidationIssue, ValidationMode, ValidationReport};
pub use self::core::{validate_transformations, validate_transformations_json, StepValidator};
