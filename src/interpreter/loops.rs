//! Loop statement execution (`while`).
//!
//! The condition is evaluated before every iteration and each pass through
//! the body runs in a fresh scope layer, so a declaration inside the body
//! creates a new binding every iteration.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Block, Expr, SourceLocation};
use tracing::debug;

impl Interpreter {
    /// Executes a `while (condition) { body }` loop.
    ///
    /// A snapshot is taken at `location` before every condition check,
    /// including the final one that ends the loop.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Block,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let mut iterations: u64 = 0;

        loop {
            self.snapshot_at(location)?;
            if !self.evaluate_condition(condition)? {
                break;
            }
            self.execute_block(body)?;
            iterations += 1;
        }

        debug!(line = location.line, iterations, "while finished");
        Ok(())
    }
}
