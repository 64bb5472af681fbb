//! Binary operator evaluation
//!
//! Both operands go through [`promote`] first, so every operator sees either
//! two ints or two floats. Integer arithmetic is checked: overflow is an
//! error rather than a wrap. Float arithmetic follows IEEE 754, including
//! division by zero.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{promote, Operands, Value};
use crate::parser::ast::{BinOp, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Add => Self::checked_add_values(left, right, location),
            BinOp::Sub => Self::checked_sub_values(left, right, location),
            BinOp::Mul => Self::checked_mul_values(left, right, location),
            BinOp::Div => Self::checked_div_values(left, right, location),
            BinOp::Mod => Self::checked_mod_values(left, right, location),
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                Err(RuntimeError::TypeError {
                    message: format!("comparison '{}' does not produce a number", op.symbol()),
                    location,
                })
            }
        }
    }

    #[inline]
    pub(crate) fn checked_add_values(
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match promote(left, right) {
            Operands::Ints(a, b) => a
                .checked_add(b)
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("{} + {}", a, b),
                    location,
                })
                .map(Value::Int),
            Operands::Floats(a, b) => Ok(Value::Float(a + b)),
        }
    }

    #[inline]
    pub(crate) fn checked_sub_values(
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match promote(left, right) {
            Operands::Ints(a, b) => a
                .checked_sub(b)
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("{} - {}", a, b),
                    location,
                })
                .map(Value::Int),
            Operands::Floats(a, b) => Ok(Value::Float(a - b)),
        }
    }

    #[inline]
    pub(crate) fn checked_mul_values(
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match promote(left, right) {
            Operands::Ints(a, b) => a
                .checked_mul(b)
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("{} * {}", a, b),
                    location,
                })
                .map(Value::Int),
            Operands::Floats(a, b) => Ok(Value::Float(a * b)),
        }
    }

    /// Integer division truncates toward zero
    #[inline]
    pub(crate) fn checked_div_values(
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match promote(left, right) {
            Operands::Ints(a, 0) => Err(RuntimeError::DivisionByZero {
                operation: format!("{} / 0", a),
                location,
            }),
            Operands::Ints(a, b) => a
                .checked_div(b)
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("{} / {}", a, b),
                    location,
                })
                .map(Value::Int),
            Operands::Floats(a, b) => Ok(Value::Float(a / b)),
        }
    }

    /// Remainder takes the sign of the dividend; only defined for ints
    #[inline]
    pub(crate) fn checked_mod_values(
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match promote(left, right) {
            Operands::Ints(a, 0) => Err(RuntimeError::DivisionByZero {
                operation: format!("{} % 0", a),
                location,
            }),
            Operands::Ints(a, b) => a
                .checked_rem(b)
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("{} % {}", a, b),
                    location,
                })
                .map(Value::Int),
            Operands::Floats(..) => Err(RuntimeError::TypeError {
                message: format!(
                    "operator '%' requires int operands, got {} and {}",
                    left.type_kind(),
                    right.type_kind()
                ),
                location,
            }),
        }
    }

    /// Compare after promotion. NaN compares unequal to everything.
    pub(crate) fn compare_values(op: BinOp, left: Value, right: Value) -> bool {
        match promote(left, right) {
            Operands::Ints(a, b) => Self::compare(op, &a, &b),
            Operands::Floats(a, b) => Self::compare(op, &a, &b),
        }
    }

    fn compare<T: PartialOrd>(op: BinOp, a: &T, b: &T) -> bool {
        match op {
            BinOp::Eq => a == b,
            BinOp::Ne => a != b,
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            BinOp::Gt => a > b,
            BinOp::Ge => a >= b,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    fn eval(op: BinOp, l: Value, r: Value) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Add => Interpreter::checked_add_values(l, r, loc()),
            BinOp::Sub => Interpreter::checked_sub_values(l, r, loc()),
            BinOp::Mul => Interpreter::checked_mul_values(l, r, loc()),
            BinOp::Div => Interpreter::checked_div_values(l, r, loc()),
            BinOp::Mod => Interpreter::checked_mod_values(l, r, loc()),
            _ => panic!("not arithmetic"),
        }
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(eval(BinOp::Div, Value::Int(10), Value::Int(3)), Ok(Value::Int(3)));
        assert_eq!(eval(BinOp::Div, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-3)));
        assert_eq!(eval(BinOp::Mod, Value::Int(17), Value::Int(5)), Ok(Value::Int(2)));
        assert_eq!(eval(BinOp::Mod, Value::Int(100), Value::Int(7)), Ok(Value::Int(2)));
        assert_eq!(eval(BinOp::Mod, Value::Int(-7), Value::Int(3)), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_mixed_operands_promote_to_float() {
        assert_eq!(eval(BinOp::Add, Value::Int(1), Value::Float(0.5)), Ok(Value::Float(1.5)));
        assert_eq!(eval(BinOp::Div, Value::Float(7.0), Value::Int(2)), Ok(Value::Float(3.5)));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            eval(BinOp::Div, Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval(BinOp::Mod, Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert_eq!(
            eval(BinOp::Div, Value::Float(1.0), Value::Int(0)),
            Ok(Value::Float(f64::INFINITY))
        );
        match eval(BinOp::Div, Value::Float(0.0), Value::Float(0.0)) {
            Ok(Value::Float(x)) => assert!(x.is_nan()),
            other => panic!("Expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_float_modulo_is_type_error() {
        assert!(matches!(
            eval(BinOp::Mod, Value::Float(5.5), Value::Int(2)),
            Err(RuntimeError::TypeError { .. })
        ));
    }

    #[test]
    fn test_overflow_is_checked() {
        assert!(matches!(
            eval(BinOp::Add, Value::Int(i64::MAX), Value::Int(1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval(BinOp::Div, Value::Int(i64::MIN), Value::Int(-1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval(BinOp::Mul, Value::Int(i64::MAX), Value::Int(2)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_comparisons() {
        assert!(Interpreter::compare_values(BinOp::Lt, Value::Int(1), Value::Int(2)));
        assert!(Interpreter::compare_values(BinOp::Eq, Value::Int(2), Value::Float(2.0)));
        assert!(!Interpreter::compare_values(BinOp::Ge, Value::Float(1.5), Value::Int(2)));
        assert!(Interpreter::compare_values(BinOp::Ne, Value::Float(f64::NAN), Value::Float(f64::NAN)));
        assert!(!Interpreter::compare_values(BinOp::Eq, Value::Float(f64::NAN), Value::Float(f64::NAN)));
    }
}
