//! Reshape Core - Declarative JSON transformation engine
//!
//! This crate applies pipelines of typed transformation steps (map, filter,
//! format, extract, aggregate, combine, conditional, loop, sort) to arbitrary
//! JSON values, and validates pipeline definitions before they run.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Transform**: The step model and the step interpreter
//! - **Condition**: A small, safe boolean expression language for `filter` and `conditional`
//! - **Pipeline**: Ordered execution with per-step tracing (`preview`)
//! - **Validator**: Structural checks of pipeline definitions
//!
//! Every entry point is synchronous and free of shared state; calls from
//! different threads need no coordination.
//!
//! # Example
//!
//! ```
//! use reshape_core::{preview_transformations_json, validate_transformations_json};
//! use serde_json::json;
//!
//! let steps = json!([
//!     {"type": "extract", "field": "user.name", "outputField": "name"},
//!     {"type": "format", "field": "name", "operation": "uppercase"}
//! ]);
//!
//! assert!(validate_transformations_json(&steps).valid);
//!
//! let result = preview_transformations_json(&json!({"user": {"name": "ana"}}), &steps);
//! assert!(result.success);
//! assert_eq!(result.data, json!({"user": {"name": "ana"}, "name": "ANA"}));
//! ```

pub mod condition;
pub mod error;
pub mod pipeline;
pub mod transform;
pub mod validator;

mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Error, Result, Severity};
pub use pipeline::{
    preview_transformations, preview_transformations_json, PreviewResult, StepTrace,
    TransformationPipeline,
};
pub use transform::{
    apply, built_in, TransformationError, TransformationKind, TransformationStep,
    TransformationStepBuilder,
};
pub use validator::{
    validate_transformations, validate_transformations_json, StepValidator, ValidationIssue,
    ValidationMode, ValidationReport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
