//! Condition expressions for `filter` and `conditional` steps
//!
//! Conditions are short boolean expressions over field names of the current
//! item, for example `age >= 18 && status == 'active'`. They are parsed into an
//! AST once and evaluated by a small interpreter; no text is ever executed.
//!
//! Evaluation is fail-safe: a condition that cannot be parsed or evaluated is
//! treated as false.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod operand;
pub mod parser;
pub mod predicate;

pub use ast::{BinaryOperator, Expr, Literal, UnaryOperator};
pub use error::ConditionError;
pub use evaluator::Evaluator;
pub use operand::Operand;
pub use predicate::StepPredicate;

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A parsed condition expression
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    /// Parse a condition expression
    pub fn parse(source: &str) -> Result<Self, ConditionError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Evaluate against an item, surfacing evaluation errors
    pub fn evaluate(&self, item: &Value) -> Result<bool, ConditionError> {
        Evaluator::new(&self.source)
            .evaluate(&self.expr, item)
            .map(|result| result.is_truthy())
    }

    /// Evaluate against an item; evaluation errors count as false
    pub fn matches(&self, item: &Value) -> bool {
        self.evaluate(item).unwrap_or_else(|e| {
            debug!(condition = %self.source, error = %e, "Condition evaluation failed");
            false
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Field names referenced by the condition
    pub fn fields(&self) -> Vec<&str> {
        self.expr.fields()
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and evaluate a condition in one go; any failure yields `false`
pub fn evaluate_condition(source: &str, item: &Value) -> bool {
    match Condition::parse(source) {
        Ok(condition) => condition.matches(item),
        Err(e) => {
            debug!(condition = %source, error = %e, "Condition failed to parse");
            false
        }
    }
}
