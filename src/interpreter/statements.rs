//! Statement execution
//!
//! Adds `impl Interpreter` methods for every statement form except `while`,
//! which lives in `loops`.
//!
//! A snapshot is taken after each leaf statement (declaration, assignment,
//! print) and when entering an `if`, so the viewer can stop on every line that
//! does something.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::*;
use tracing::debug;

impl Interpreter {
    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        self.current_location = stmt.location();

        match stmt {
            Stmt::VarDecl {
                name,
                var_type,
                init,
                location,
            } => self.execute_var_decl(name, *var_type, init.as_ref(), *location),

            Stmt::Assignment {
                name,
                value,
                location,
            } => self.execute_assignment(name, value, *location),

            Stmt::Print { expr, location } => self.execute_print(expr, *location),

            Stmt::If {
                condition,
                then_block,
                else_branch,
                location,
            } => self.execute_if(condition, then_block, else_branch.as_deref(), *location),

            Stmt::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            Stmt::Block(block) => self.execute_block(block),
        }
    }

    /// Execute a `{ }` block in its own scope layer
    pub(crate) fn execute_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        self.with_scope(|interp| interp.execute_statements(&block.statements))
    }

    fn execute_var_decl(
        &mut self,
        name: &str,
        var_type: TypeKind,
        init: Option<&Expr>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        // The initializer sees any outer binding of the same name
        let init_value = init.map(|expr| self.evaluate_expr(expr)).transpose()?;

        self.scopes
            .declare(name, var_type, init_value, location)
            .map_err(|e| e.at(location))?;

        debug!(
            line = location.line,
            scope = self.scopes.current_name(),
            "declare {} {}",
            var_type,
            name
        );
        self.take_snapshot()
    }

    fn execute_assignment(
        &mut self,
        name: &str,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(value)?;
        let stored = self
            .scopes
            .assign(name, value)
            .map_err(|e| e.at(location))?;

        debug!(line = location.line, "{} = {}", name, stored);
        self.take_snapshot()
    }

    fn execute_print(&mut self, expr: &Expr, location: SourceLocation) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        debug!(line = location.line, "print {}", value);
        self.emit_line(value.to_string(), location)?;
        self.take_snapshot()
    }

    fn execute_if(
        &mut self,
        condition: &Expr,
        then_block: &Block,
        else_branch: Option<&Stmt>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.snapshot_at(location)?;

        let taken = self.evaluate_condition(condition)?;
        debug!(line = location.line, taken, "if");

        if taken {
            self.execute_block(then_block)
        } else if let Some(else_stmt) = else_branch {
            self.execute_statement(else_stmt)
        } else {
            Ok(())
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
    fn test_shadowing_leaves_outer_untouched() {
        let (out, result) = run("int t; t = 100; { int t; t = 50; print(t); } print(t);");
        result.unwrap();
        assert_eq!(out, vec!["50", "100"]);
    }

    #[test]
    fn test_initializer_sees_outer_binding() {
        let (out, result) = run("int x = 3; { int x = x + 1; print(x); } print(x);");
        result.unwrap();
        assert_eq!(out, vec!["4", "3"]);
    }

    #[test]
    fn test_uninitialized_is_zero() {
        let (out, result) = run("int i; float f; print(i); print(f);");
        result.unwrap();
        assert_eq!(out, vec!["0", "0.0"]);
    }

    #[test]
    fn test_duplicate_declaration_in_same_block() {
        let (out, result) = run("print(1);\nint a;\nint a;\nprint(2);");
        assert_eq!(out, vec!["1"]);
        match result {
            Err(RuntimeError::DuplicateDeclaration { name, location, previous }) => {
                assert_eq!(name, "a");
                assert_eq!(location.line, 3);
                assert_eq!(previous.line, 2);
            }
            other => panic!("Expected duplicate declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain_picks_first_true_branch() {
        let source = "int s = 85; if (s >= 90) { print(1); } else if (s >= 80) { print(2); } else { print(3); }";
        let (out, result) = run(source);
        result.unwrap();
        assert_eq!(out, vec!["2"]);
    }

    #[test]
    fn test_scope_popped_after_failing_block() {
        let mut interp = Interpreter::new(parse_source("int x; { int y; y = 1 / 0; }").unwrap());
        assert!(interp.run().is_err());
        assert_eq!(interp.scopes().depth(), 0);
        assert!(interp.scopes().resolve("y").is_err());
    }

    #[test]
    fn test_branch_block_gets_its_own_scope() {
        let (_, result) = run("int v; if (1) { int w; } w = 2;");
        assert!(matches!(result, Err(RuntimeError::UndeclaredIdentifier { .. })));
    }
}
