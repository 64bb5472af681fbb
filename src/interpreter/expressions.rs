//! Expression evaluation
//!
//! Comparisons produce a truth value that only `if` and `while` conditions
//! consume. Using one anywhere a number is needed (an assignment, a print,
//! an arithmetic operand) is a type error.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    /// Evaluate an expression to a numeric value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::FloatLiteral(x, _) => Ok(Value::Float(*x)),

            Expr::Variable(name, location) => self
                .scopes
                .resolve(name)
                .map(|binding| binding.value)
                .map_err(|e| e.at(*location)),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                if op.is_comparison() {
                    return Err(RuntimeError::TypeError {
                        message: format!(
                            "comparison '{}' can only be used as an if/while condition",
                            op.symbol()
                        ),
                        location: *location,
                    });
                }
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                self.evaluate_binary_op(*op, left, right, *location)
            }

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => {
                let value = self.evaluate_expr(operand)?;
                self.evaluate_unary_op(*op, value, *location)
            }
        }
    }

    /// Evaluate an `if`/`while` condition.
    ///
    /// A top-level comparison yields its truth value directly; any other
    /// expression is true when non-zero.
    pub(crate) fn evaluate_condition(&mut self, expr: &Expr) -> Result<bool, RuntimeError> {
        match expr {
            Expr::BinaryOp {
                op, left, right, ..
            } if op.is_comparison() => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                Ok(Self::compare_values(*op, left, right))
            }
            _ => Ok(self.evaluate_expr(expr)?.is_truthy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::interpreter::errors::RuntimeError;
    use crate::parser::parse_source;

    fn run(source: &str) -> (Vec<String>, Result<(), RuntimeError>) {
        let mut interp = Interpreter::new(parse_source(source).unwrap());
        let result = interp.run();
        (interp.output(), result)
    }

    #[test]
    fn test_precedence() {
        let (out, result) = run("print(2 + 3 * 4); print((2 + 3) * 4); print(10 - 6 / 2);");
        result.unwrap();
        assert_eq!(out, vec!["14", "20", "7"]);
    }

    #[test]
    fn test_comparison_as_value_is_type_error() {
        let (out, result) = run("int a; a = 1 < 2;");
        assert!(out.is_empty());
        assert!(matches!(result, Err(RuntimeError::TypeError { .. })));

        let (_, result) = run("print(3 == 3);");
        assert!(matches!(result, Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn test_numeric_condition_truthiness() {
        let (out, result) = run("int n = 2; if (n - 2) { print(1); } else { print(0); } if (0.5) { print(2); }");
        result.unwrap();
        assert_eq!(out, vec!["0", "2"]);
    }

    #[test]
    fn test_undeclared_identifier_in_expression() {
        let (out, result) = run("print(1);\nprint(missing + 1);");
        assert_eq!(out, vec!["1"]);
        match result {
            Err(RuntimeError::UndeclaredIdentifier { name, location }) => {
                assert_eq!(name, "missing");
                assert_eq!(location.line, 2);
            }
            other => panic!("Expected undeclared identifier, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_comparison_promotes() {
        let (out, result) = run("if (1 == 1.0) { print(1); } if (2 > 1.5) { print(2); }");
        result.unwrap();
        assert_eq!(out, vec!["1", "2"]);
    }
}
