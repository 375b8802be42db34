//! Error types for condition expressions
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing or evaluating a condition expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    /// The expression text is malformed
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// The expression is well formed but cannot be evaluated
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String, input: String },
}

impl ConditionError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create an evaluation error
    pub fn evaluation(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
            input: input.into(),
        }
    }

    /// The expression text this error refers to
    pub fn input(&self) -> &str {
        match self {
            Self::Parse { input, .. } | Self::Evaluation { input, .. } => input,
        }
    }

    /// Render the error with a caret under the failing position
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse {
                message,
                position,
                input,
            } => {
                let offset = input
                    .get(..*position)
                    .map(|prefix| prefix.chars().count())
                    .unwrap_or(*position);
                let caret = " ".repeat(offset);
                format!("{}\n  {}\n  {}^", message, input, caret)
            }
            Self::Evaluation { message, input } => format!("{} in '{}'", message, input),
        }
    }
}

impl From<ConditionError> for crate::Error {
    fn from(err: ConditionError) -> Self {
        crate::Error::Condition {
            message: err.to_string(),
            expression: err.input().to_string(),
        }
    }
}
