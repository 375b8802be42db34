//! Declarative transformation steps and their interpreter
//!
//! A transformation step is a pure description of one operation over a JSON
//! value: copy a field, filter a list, format a string, reduce numbers and so
//! on. The interpreter applies a step and returns a new value.
//!
//! # Module Organization
//!
//! - [`types`] - Step model, kinds and error definitions
//! - [`interpreter`] - Per-kind semantics
//! - [`path`] - Dot-path reads and copy-on-write updates
//! - [`coerce`] - Loose value coercions
//! - [`builder`] - Fluent builder API for creating steps
//! - [`built_in`] - Pre-configured steps for common use cases
//!
//! # Examples
//!
//! ```
//! use reshape_core::transform::{apply, built_in, TransformationKind, TransformationStepBuilder};
//! use serde_json::json;
//!
//! let step = TransformationStepBuilder::new(TransformationKind::Format)
//!     .field("name")
//!     .operation("title_case")
//!     .build()
//!     .unwrap();
//!
//! let result = apply(&json!({"name": "ada LOVELACE"}), &step).unwrap();
//! assert_eq!(result, json!({"name": "Ada Lovelace"}));
//!
//! let total = apply(&json!([{"v": 1}, {"v": 2}]), &built_in::sum(Some("v"))).unwrap();
//! assert_eq!(total, json!(3));
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub mod interpreter;

pub mod path;

pub mod coerce;

pub mod builder;

pub mod built_in;

#[cfg(test)]
mod tests;

pub use types::{DeclaredKind, TransformationError, TransformationKind, TransformationStep};

pub use builder::TransformationStepBuilder;
pub use interpreter::{aggregate, apply, format_value, AggregateOperation};
pub use path::{get_path, set_path};
