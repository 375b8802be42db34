//! Shared utilities for command handlers

use crate::config::LimitsConfig;
use crate::error::{Error, Result};
use reshape_core::TransformationPipeline;
use reshape_schemas::{load_document, Format};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key under which a pipeline object keeps its steps
const TRANSFORMATIONS_KEY: &str = "transformations";

/// Load a pipeline document, unwrapping `{"transformations": [...]}`
pub fn load_pipeline_document(path: &Path) -> Result<Value> {
    let document = load_document(path)?;
    match document {
        Value::Object(mut map) if map.contains_key(TRANSFORMATIONS_KEY) => {
            debug!(path = %path.display(), "Unwrapping transformations object");
            Ok(map.remove(TRANSFORMATIONS_KEY).unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Parse a pipeline document into steps and check it against the limits
pub fn parse_pipeline(path: &Path, document: Value, limits: &LimitsConfig) -> Result<TransformationPipeline> {
    if !document.is_array() {
        return Err(Error::InvalidPipeline {
            path: path.to_path_buf(),
            reason: "expected an array of steps or an object with a 'transformations' array"
                .to_string(),
        });
    }

    let pipeline: TransformationPipeline =
        serde_json::from_value(document).map_err(|e| Error::InvalidPipeline {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    check_depth(&pipeline, limits)?;
    Ok(pipeline)
}

/// Reject pipelines nested deeper than the configured limit
pub fn check_depth(pipeline: &TransformationPipeline, limits: &LimitsConfig) -> Result<()> {
    let depth = pipeline.max_depth();
    if depth > limits.max_nesting_depth {
        return Err(Error::PipelineTooDeep {
            depth,
            limit: limits.max_nesting_depth,
        });
    }
    Ok(())
}

/// Write a value to a file, as YAML for `.yaml`/`.yml` and pretty JSON otherwise
pub fn save_value(path: &Path, value: &Value) -> Result<()> {
    let content = match Format::from_path(path) {
        Ok(Format::Yaml) => serde_yaml::to_string(value)?,
        _ => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            json
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
