//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &self,
        op: UnOp,
        value: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Neg => Self::evaluate_neg_op(value, location),
        }
    }

    fn evaluate_neg_op(value: Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        match value {
            Value::Int(n) => n
                .checked_neg()
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("-({})", n),
                    location,
                })
                .map(Value::Int),
            Value::Float(x) => Ok(Value::Float(-x)),
        }
    }
}
