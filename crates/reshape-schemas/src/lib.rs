//! Reshape Schemas - schema inference and compatibility analysis
//!
//! This crate derives structural schemas from sample JSON values and scores
//! how well one schema can feed another:
//! - **Inference**: type, properties, item schema, required keys and examples
//!   from one or more samples, with a confidence that grows with the sample count
//! - **Compatibility**: a score in `[0, 1]`, issues with severities, and
//!   `format` steps that fix convertible type differences
//! - **JSON Schema**: export of inferred schemas as draft 2020-12 documents and
//!   conformance checks through the `jsonschema` crate
//!
//! ## Quick Start
//!
//! ```rust
//! use reshape_schemas::{analyze_compatibility, infer_schema};
//! use serde_json::json;
//!
//! let source = infer_schema(&json!({"id": "42"}), &[]);
//! let target = infer_schema(&json!({"id": "7", "email": "a@b.c"}), &[]);
//!
//! let report = analyze_compatibility(&source, &target);
//! assert!(report.compatible);
//! assert_eq!(report.issues.len(), 1);
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod compatibility;
pub mod error;
pub mod inference;
pub mod json_schema;
pub mod loader;

// Re-export commonly used types for convenience
pub use compatibility::{
    analyze_compatibility, analyze_compatibility_json, CompatibilityIssue, CompatibilityReport,
    IssueType, Suggestion, SuggestionType,
};
pub use error::{SchemaError, SchemaResult};
pub use inference::{
    infer_schema, infer_schema_json, PropertySchema, SchemaInferrer, SchemaNode, SchemaType,
};
pub use json_schema::conforms;
pub use loader::{load_document, load_schema, Format};
