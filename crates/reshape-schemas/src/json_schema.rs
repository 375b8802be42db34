//! JSON Schema export and conformance checks
//!
//! An inferred [`SchemaNode`] maps onto a draft 2020-12 document: object
//! nodes list their properties and required keys, array nodes their items,
//! and `unknown` nodes accept anything.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::{SchemaError, SchemaResult};
use crate::inference::{SchemaNode, SchemaType};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Dialect URI written into exported documents
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

impl SchemaNode {
    /// Export this node as a standalone JSON Schema document
    pub fn to_json_schema(&self) -> Value {
        let mut document = node_schema(self);
        if let Value::Object(map) = &mut document {
            map.insert("$schema".to_string(), Value::String(DRAFT_2020_12.to_string()));
        }
        document
    }
}

fn node_schema(node: &SchemaNode) -> Value {
    let mut schema = Map::new();

    match node.schema_type {
        SchemaType::Unknown => {}
        SchemaType::Object => {
            schema.insert("type".to_string(), json!("object"));
            let properties: Map<String, Value> = node
                .properties
                .iter()
                .flatten()
                .map(|(name, property)| (name.clone(), node_schema(&property.schema)))
                .collect();
            schema.insert("properties".to_string(), Value::Object(properties));
            let required = node.required_properties();
            if !required.is_empty() {
                schema.insert("required".to_string(), json!(required));
            }
        }
        SchemaType::Array => {
            schema.insert("type".to_string(), json!("array"));
            if let Some(items) = &node.items {
                // Arrays observed empty carry a null items node; that constrains nothing
                if items.schema_type != SchemaType::Null {
                    schema.insert("items".to_string(), node_schema(items));
                }
            }
        }
        other => {
            schema.insert("type".to_string(), json!(other.as_str()));
        }
    }

    if node.schema_type.is_primitive() && !node.examples.is_empty() {
        schema.insert("examples".to_string(), Value::Array(node.examples.clone()));
    }
    Value::Object(schema)
}

/// Check `value` against the JSON Schema exported from `schema`
///
/// Returns one message per violation; an empty list means the value conforms.
pub fn conforms(schema: &SchemaNode, value: &Value) -> SchemaResult<Vec<String>> {
    let document = schema.to_json_schema();
    let validator = jsonschema::validator_for(&document).map_err(|e| SchemaError::Compile {
        message: e.to_string(),
    })?;

    let violations: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    debug!(violations = violations.len(), "Checked conformance");
    Ok(violations)
}
