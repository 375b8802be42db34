//! Loading JSON and YAML documents from disk
//!
//! Data samples, pipeline definitions and schema files share one loader.
//! The format is chosen by file extension.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::{SchemaError, SchemaResult};
use crate::inference::SchemaNode;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> SchemaResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(SchemaError::unsupported_format(path)),
        }
    }
}

/// Parse document content in the given format
pub fn parse_document(content: &str, format: Format, path: &Path) -> SchemaResult<Value> {
    match format {
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|source| SchemaError::YamlParse {
                    path: path.to_path_buf(),
                    source,
                })?;
            serde_json::to_value(yaml).map_err(|source| SchemaError::JsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        Format::Json => serde_json::from_str(content).map_err(|source| SchemaError::JsonParse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and parse a JSON or YAML document
pub fn load_document(path: &Path) -> SchemaResult<Value> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    debug!(path = %path.display(), ?format, bytes = content.len(), "Loaded document");
    parse_document(&content, format, path)
}

/// Read a schema node from a JSON or YAML file
pub fn load_schema(path: &Path) -> SchemaResult<SchemaNode> {
    SchemaNode::from_value(&load_document(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.txt")),
            Err(SchemaError::UnsupportedFormat { .. })
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("schema.yaml");
        let json_path = dir.path().join("schema.json");
        std::fs::write(&yaml, "type: object\nproperties:\n  id:\n    type: string\n    required: true\n").unwrap();
        std::fs::write(
            &json_path,
            r#"{"type": "object", "properties": {"id": {"type": "string", "required": true}}}"#,
        )
        .unwrap();

        assert_eq!(load_schema(&yaml).unwrap(), load_schema(&json_path).unwrap());
        assert_eq!(load_document(&yaml).unwrap()["properties"]["id"]["required"], json!(true));
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(&PathBuf::from("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_document(&path), Err(SchemaError::JsonParse { .. })));
    }
}
