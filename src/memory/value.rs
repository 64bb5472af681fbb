//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the interpreter. Values are tagged, so the int/float distinction never depends on
//! implicit host-language coercion.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Float`]: 64-bit IEEE float
//!
//! # Promotion
//!
//! [`promote`] is the single place that decides the operand kind of a binary operation:
//!
//! | left  | right | operands |
//! |-------|-------|----------|
//! | int   | int   | int      |
//! | int   | float | float    |
//! | float | int   | float    |
//! | float | float | float    |

use crate::parser::ast::TypeKind;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// The zero value a fresh declaration of `ty` is bound to
    pub fn zero(ty: TypeKind) -> Self {
        match ty {
            TypeKind::Int => Value::Int(0),
            TypeKind::Float => Value::Float(0.0),
        }
    }

    pub fn type_kind(&self) -> TypeKind {
        match self {
            Value::Int(_) => TypeKind::Int,
            Value::Float(_) => TypeKind::Float,
        }
    }

    /// Numeric value widened to f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(x) => *x,
        }
    }

    /// Non-zero values are true
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
        }
    }

    /// Convert to the storage representation of `ty`.
    ///
    /// Int to float widens; float to int truncates toward zero. Returns `None`
    /// when a float is NaN, infinite, or outside the i64 range.
    pub fn coerce_to(self, ty: TypeKind) -> Option<Value> {
        match (ty, self) {
            (TypeKind::Int, Value::Int(_)) | (TypeKind::Float, Value::Float(_)) => Some(self),
            (TypeKind::Float, Value::Int(n)) => Some(Value::Float(n as f64)),
            (TypeKind::Int, Value::Float(x)) => float_to_int(x).map(Value::Int),
        }
    }
}

/// Truncate toward zero, rejecting values an i64 cannot hold
fn float_to_int(x: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = x.trunc();
    if truncated.is_finite() && truncated >= -LIMIT && truncated < LIMIT {
        Some(truncated as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Debug keeps the decimal point on integral floats (10.0, not 10)
            Value::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Operand pair after promotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operands {
    Ints(i64, i64),
    Floats(f64, f64),
}

/// Apply the promotion table to a pair of operands
pub fn promote(left: Value, right: Value) -> Operands {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Operands::Ints(a, b),
        (a, b) => Operands::Floats(a.as_f64(), b.as_f64()),
    }
}
