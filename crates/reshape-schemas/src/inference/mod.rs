//! Structural schema inference
//!
//! ```
//! use reshape_schemas::inference::{infer_schema, SchemaType};
//! use serde_json::json;
//!
//! let schema = infer_schema(&json!({"id": 1, "tags": ["a"]}), &[json!({"id": 2})]);
//! assert_eq!(schema.schema_type, SchemaType::Object);
//! assert!(schema.property("id").unwrap().required);
//! assert!(!schema.property("tags").unwrap().required);
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

mod core;
pub mod types;

pub use self::core::{
    confidence_for, infer_schema, infer_schema_json, SchemaInferrer, DEFAULT_MAX_DEPTH,
    MAX_EXAMPLES, REQUIRED_PRESENCE,
};
pub use types::{PropertySchema, SchemaNode, SchemaType};
