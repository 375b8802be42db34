//! Condition evaluation
//!
//! Walks the AST against the current item with short-circuit `&&`/`||`.
//! Field references resolve through the same dot paths the interpreter uses.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::ConditionError;
use super::operand::Operand;
use crate::transform::path::get_path;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

/// Evaluator bound to the source text of the expression, for error reporting
pub struct Evaluator<'a> {
    source: &'a str,
}

impl<'a> Evaluator<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Evaluate an expression against an item
    pub fn evaluate(&self, expr: &Expr, item: &Value) -> Result<Operand, ConditionError> {
        match expr {
            Expr::Literal(literal) => Ok(literal_operand(literal)),
            Expr::Field(path) => Ok(get_path(item, path)
                .map(Operand::from_value)
                .unwrap_or(Operand::Undefined)),
            Expr::Unary { operator, operand } => {
                let value = self.evaluate(operand, item)?;
                Ok(match operator {
                    UnaryOperator::Not => Operand::Bool(!value.is_truthy()),
                    UnaryOperator::Negate => Operand::Number(-value.to_number()),
                })
            }
            Expr::Binary { left, operator, right } => {
                self.evaluate_binary(left, *operator, right, item)
            }
        }
    }

    fn evaluate_binary(
        &self,
        left: &Expr,
        operator: BinaryOperator,
        right: &Expr,
        item: &Value,
    ) -> Result<Operand, ConditionError> {
        let left_value = self.evaluate(left, item)?;

        // Short-circuit evaluation returns the deciding operand
        match operator {
            BinaryOperator::And if !left_value.is_truthy() => Ok(left_value),
            BinaryOperator::Or if left_value.is_truthy() => Ok(left_value),
            BinaryOperator::And | BinaryOperator::Or => self.evaluate(right, item),
            _ => {
                let right_value = self.evaluate(right, item)?;
                self.compare(&left_value, operator, &right_value).map(Operand::Bool)
            }
        }
    }

    fn compare(
        &self,
        left: &Operand,
        operator: BinaryOperator,
        right: &Operand,
    ) -> Result<bool, ConditionError> {
        let result = match operator {
            BinaryOperator::Equal => left.loose_equals(right),
            BinaryOperator::NotEqual => !left.loose_equals(right),
            BinaryOperator::StrictEqual => left.strict_equals(right),
            BinaryOperator::StrictNotEqual => !left.strict_equals(right),
            BinaryOperator::LessThan => left.compare(right) == Some(Ordering::Less),
            BinaryOperator::LessThanOrEqual => {
                matches!(left.compare(right), Some(Ordering::Less | Ordering::Equal))
            }
            BinaryOperator::GreaterThan => left.compare(right) == Some(Ordering::Greater),
            BinaryOperator::GreaterThanOrEqual => {
                matches!(left.compare(right), Some(Ordering::Greater | Ordering::Equal))
            }
            BinaryOperator::RegexMatch => {
                let pattern = right.to_display_string();
                let regex = Regex::new(&pattern).map_err(|e| {
                    ConditionError::evaluation(
                        format!("Invalid regex '{}': {}", pattern, e),
                        self.source,
                    )
                })?;
                regex.is_match(&left.to_display_string())
            }
            BinaryOperator::And => left.is_truthy() && right.is_truthy(),
            BinaryOperator::Or => left.is_truthy() || right.is_truthy(),
        };
        Ok(result)
    }
}

fn literal_operand(literal: &Literal) -> Operand {
    match literal {
        Literal::String(s) => Operand::String(s.clone()),
        Literal::Number(n) => Operand::Number(*n),
        Literal::Boolean(b) => Operand::Bool(*b),
        Literal::Null => Operand::Null,
        Literal::Undefined => Operand::Undefined,
    }
}
