//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use reshape_schemas::SchemaError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the transformation engine
    #[error("Core error: {0}")]
    Core(#[from] reshape_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: {}", path.display(), reason)]
    InvalidFormat { path: PathBuf, reason: String },

    /// A pipeline file that does not describe a step list
    #[error("Invalid pipeline in {}: {}", path.display(), reason)]
    InvalidPipeline { path: PathBuf, reason: String },

    /// Pipeline nesting beyond the configured limit
    #[error("Pipeline nesting depth {depth} exceeds the limit of {limit}")]
    PipelineTooDeep { depth: usize, limit: usize },

    /// More samples than the configured limit
    #[error("{count} samples exceed the limit of {limit}")]
    TooManySamples { count: usize, limit: usize },

    /// A preview run that did not succeed
    #[error("Preview failed: {0}")]
    PreviewFailed(String),

    /// A pipeline with validation errors
    #[error("Pipeline is invalid: {errors} error(s)")]
    ValidationFailed { errors: usize },

    /// Schemas that are not compatible
    #[error("Schemas are not compatible (score {score:.2})")]
    Incompatible { score: f64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Io { path, source } if source.kind() == io::ErrorKind::NotFound => {
                Error::FileNotFound { path }
            }
            SchemaError::Io { source, .. } => Error::Io(source),
            SchemaError::UnsupportedFormat { path } => Error::InvalidFormat {
                path,
                reason: "expected .json, .yaml or .yml".to_string(),
            },
            SchemaError::JsonParse { path, source } => Error::InvalidFormat {
                path,
                reason: source.to_string(),
            },
            SchemaError::YamlParse { path, source } => Error::InvalidFormat {
                path,
                reason: source.to_string(),
            },
            other => Error::other(other.to_string()),
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::InvalidPipeline { .. } => 7,
            Self::PipelineTooDeep { .. } => 8,
            Self::TooManySamples { .. } => 9,
            Self::PreviewFailed(_) => 10,
            Self::ValidationFailed { .. } => 11,
            Self::Incompatible { .. } => 12,
            Self::Json(_) => 13,
            Self::Yaml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", msg, inner),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
