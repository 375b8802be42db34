//! Runtime values of the condition language
//!
//! Conditions distinguish a missing field (`undefined`) from an explicit
//! `null`, so evaluation works on [`Operand`] rather than on raw JSON.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::transform::coerce::{format_number, parse_numeric_str, to_display_string, to_number};
use serde_json::Value;
use std::cmp::Ordering;

/// A value produced while evaluating a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Arrays and objects
    Composite(Value),
}

impl Operand {
    /// Wrap a resolved JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Bool(b) => Operand::Bool(*b),
            Value::Number(n) => Operand::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Operand::String(s.clone()),
            Value::Array(_) | Value::Object(_) => Operand::Composite(value.clone()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Operand::Undefined | Operand::Null => false,
            Operand::Bool(b) => *b,
            Operand::Number(n) => *n != 0.0 && !n.is_nan(),
            Operand::String(s) => !s.is_empty(),
            Operand::Composite(_) => true,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Operand::Undefined => f64::NAN,
            Operand::Null => 0.0,
            Operand::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Operand::Number(n) => *n,
            Operand::String(s) => parse_numeric_str(s),
            Operand::Composite(value) => to_number(value),
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            Operand::Undefined => "undefined".to_string(),
            Operand::Null => "null".to_string(),
            Operand::Bool(b) => b.to_string(),
            Operand::Number(n) => format_number(*n),
            Operand::String(s) => s.clone(),
            Operand::Composite(value) => to_display_string(value),
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Operand::Undefined | Operand::Null)
    }

    /// Composites collapse to their string form; everything else is unchanged
    fn to_primitive(&self) -> Operand {
        match self {
            Operand::Composite(value) => Operand::String(to_display_string(value)),
            other => other.clone(),
        }
    }

    /// Strict equality (`===`): same kind and same value
    ///
    /// Arrays and objects compare by value. Operands are read out of a JSON
    /// document and carry no identity, so `a === b` holds for two fields with
    /// equal contents even though a reference comparison would not.
    pub fn strict_equals(&self, other: &Operand) -> bool {
        match (self, other) {
            (Operand::Undefined, Operand::Undefined) | (Operand::Null, Operand::Null) => true,
            (Operand::Bool(a), Operand::Bool(b)) => a == b,
            (Operand::Number(a), Operand::Number(b)) => a == b,
            (Operand::String(a), Operand::String(b)) => a == b,
            (Operand::Composite(a), Operand::Composite(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality (`==`) with the usual coercions
    pub fn loose_equals(&self, other: &Operand) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Operand::Number(a), Operand::String(_)) => *a == other.to_number(),
            (Operand::String(_), Operand::Number(b)) => self.to_number() == *b,
            (Operand::Bool(a), _) => Operand::Number(if *a { 1.0 } else { 0.0 }).loose_equals(other),
            (_, Operand::Bool(b)) => self.loose_equals(&Operand::Number(if *b { 1.0 } else { 0.0 })),
            (Operand::Composite(_), Operand::Composite(_)) => self.strict_equals(other),
            (Operand::Composite(_), _) => self.to_primitive().loose_equals(other),
            (_, Operand::Composite(_)) => self.loose_equals(&other.to_primitive()),
            _ => self.strict_equals(other),
        }
    }

    /// Relational ordering; `None` when the operands are unordered (NaN involved)
    pub fn compare(&self, other: &Operand) -> Option<Ordering> {
        match (self.to_primitive(), other.to_primitive()) {
            (Operand::String(a), Operand::String(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_number().partial_cmp(&b.to_number()),
        }
    }
}
