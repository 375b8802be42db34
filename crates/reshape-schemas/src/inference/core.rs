//! Schema inference from sample values
//!
//! The primary type of a node comes from the first non-null sample. Object
//! nodes take the union of keys across all samples, array nodes infer their
//! items from the concatenation of all array samples. Nesting deeper than the
//! inferrer's bound degrades to an `unknown` node instead of recursing further.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::types::{PropertySchema, SchemaNode, SchemaType};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace, warn};

/// Default nesting bound for inference
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Examples retained per node
pub const MAX_EXAMPLES: usize = 3;

/// Share of samples a key must appear in to be required
pub const REQUIRED_PRESENCE: f64 = 0.8;

/// Confidence step function over the number of samples
pub fn confidence_for(sample_count: usize) -> f64 {
    match sample_count {
        0 => 0.0,
        1 => 0.7,
        2..=4 => 0.8,
        _ => 0.95,
    }
}

/// Schema inferrer with a configurable nesting bound
#[derive(Debug, Clone, Copy)]
pub struct SchemaInferrer {
    max_depth: usize,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SchemaInferrer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting depth beyond which nodes become `unknown`
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Infer a schema from `value` and any additional samples
    pub fn infer(&self, value: &Value, samples: &[Value]) -> SchemaNode {
        let all: Vec<&Value> = std::iter::once(value).chain(samples.iter()).collect();
        self.infer_samples(&all, 0)
    }

    fn infer_samples(&self, samples: &[&Value], depth: usize) -> SchemaNode {
        let samples: Vec<&Value> = samples.iter().copied().filter(|v| !v.is_null()).collect();
        let Some(first) = samples.first() else {
            return SchemaNode::null();
        };

        if depth > self.max_depth {
            warn!(depth, max_depth = self.max_depth, "Schema nesting too deep, giving up");
            return SchemaNode::unknown();
        }

        let schema_type = SchemaType::of(first);
        let mut node = SchemaNode::new(schema_type, confidence_for(samples.len()));
        trace!(depth, %schema_type, samples = samples.len(), "Inferring schema node");

        match schema_type {
            SchemaType::Object => {
                node.properties = Some(self.infer_properties(&samples, depth));
            }
            SchemaType::Array => {
                let flattened: Vec<&Value> = samples
                    .iter()
                    .filter_map(|sample| sample.as_array())
                    .flatten()
                    .collect();
                node.items = Some(Box::new(self.infer_samples(&flattened, depth + 1)));
            }
            _ => {
                node.examples = samples.iter().take(MAX_EXAMPLES).map(|v| (*v).clone()).collect();
            }
        }
        node
    }

    fn infer_properties(
        &self,
        samples: &[&Value],
        depth: usize,
    ) -> BTreeMap<String, PropertySchema> {
        let mut observed: BTreeMap<&str, Vec<&Value>> = BTreeMap::new();
        for object in samples.iter().filter_map(|sample| sample.as_object()) {
            for (key, value) in object {
                observed.entry(key.as_str()).or_default().push(value);
            }
        }

        let total = samples.len() as f64;
        observed
            .into_iter()
            .map(|(key, values)| {
                // Type comes from the first observation only
                let mut schema = self.infer_samples(&values[..1], depth + 1);
                schema.examples = values.iter().take(MAX_EXAMPLES).map(|v| (*v).clone()).collect();
                let presence = values.len() as f64 / total;
                let property = PropertySchema {
                    schema,
                    required: presence > REQUIRED_PRESENCE,
                };
                (key.to_string(), property)
            })
            .collect()
    }
}

/// Infer a schema from a value and additional samples
#[instrument(skip_all, fields(samples = samples.len()))]
pub fn infer_schema(value: &Value, samples: &[Value]) -> SchemaNode {
    let node = SchemaInferrer::new().infer(value, samples);
    debug!(schema_type = %node.schema_type, confidence = node.confidence, "Inferred schema");
    node
}

/// Infer a schema from raw JSON inputs
///
/// `samples` must be an array or null; anything else degrades to an
/// `unknown` node with zero confidence.
pub fn infer_schema_json(value: &Value, samples: &Value) -> SchemaNode {
    match samples {
        Value::Null => infer_schema(value, &[]),
        Value::Array(samples) => infer_schema(value, samples),
        other => {
            warn!(found = %SchemaType::of(other), "Samples must be an array");
            SchemaNode::unknown()
        }
    }
}
