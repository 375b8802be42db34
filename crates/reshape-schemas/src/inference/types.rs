//! Schema node types produced by inference
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Structural type of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
    Unknown,
}

impl SchemaType {
    /// The structural type of a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => SchemaType::Null,
            Value::Bool(_) => SchemaType::Boolean,
            Value::Number(_) => SchemaType::Number,
            Value::String(_) => SchemaType::String,
            Value::Array(_) => SchemaType::Array,
            Value::Object(_) => SchemaType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Unknown => "unknown",
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaType::String | SchemaType::Number | SchemaType::Boolean
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of an inferred schema tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// How much evidence backs this node, in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

/// A property of an object node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(flatten)]
    pub schema: SchemaNode,

    /// Present in more than 80% of the samples
    #[serde(default)]
    pub required: bool,
}

impl SchemaNode {
    /// A bare node of the given type
    pub fn new(schema_type: SchemaType, confidence: f64) -> Self {
        Self {
            schema_type,
            properties: None,
            items: None,
            confidence,
            examples: Vec::new(),
        }
    }

    /// The node produced when there is nothing to infer from
    pub fn null() -> Self {
        Self::new(SchemaType::Null, 1.0)
    }

    /// The node produced when inference gives up
    pub fn unknown() -> Self {
        Self::new(SchemaType::Unknown, 0.0)
    }

    /// Look up a property of an object node
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Names of the required properties, in name order
    pub fn required_properties(&self) -> Vec<&str> {
        self.properties
            .iter()
            .flat_map(|props| props.iter())
            .filter(|(_, prop)| prop.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Parse a node from its JSON form
    pub fn from_value(value: &Value) -> crate::SchemaResult<Self> {
        Self::deserialize(value).map_err(|source| crate::SchemaError::InvalidSchema { source })
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.schema_type {
            SchemaType::Object => {
                let count = self.properties.as_ref().map(BTreeMap::len).unwrap_or(0);
                write!(f, "object ({} properties)", count)
            }
            SchemaType::Array => match &self.items {
                Some(items) => write!(f, "array of {}", items),
                None => write!(f, "array"),
            },
            other => write!(f, "{}", other),
        }
    }
}
