//! Static declaration checker
//!
//! Walks the AST with the same scoping rules the interpreter uses, without
//! evaluating anything, and reports the first duplicate declaration or use of
//! an undeclared name. Loop bodies are visited once.
//!
//! The walk also produces the [`SymbolTable`]: every declaration with the
//! name of the scope layer it lives in (`global`, `block_1`, ...) and its
//! nesting level.

use crate::memory::scope::{ScopeError, ScopeStack};
use crate::parser::ast::*;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(
        "Duplicate declaration of '{name}' at line {} (previously declared at line {})",
        .location.line,
        .previous.line
    )]
    DuplicateDeclaration {
        name: String,
        location: SourceLocation,
        previous: SourceLocation,
    },

    #[error("Undeclared identifier '{name}' at line {}, column {}", .location.line, .location.column)]
    UndeclaredIdentifier {
        name: String,
        location: SourceLocation,
    },
}

impl AnalysisError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            AnalysisError::DuplicateDeclaration { location, .. } => location,
            AnalysisError::UndeclaredIdentifier { location, .. } => location,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            AnalysisError::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
        }
    }

    fn from_scope(err: ScopeError, location: SourceLocation) -> Self {
        match err {
            ScopeError::Duplicate { name, previous } => AnalysisError::DuplicateDeclaration {
                name,
                location,
                previous,
            },
            // Declarations are checked without values, so only a missing name remains
            ScopeError::Undeclared { name } | ScopeError::Conversion { name, .. } => {
                AnalysisError::UndeclaredIdentifier { name, location }
            }
        }
    }
}

/// One declaration found in the program
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub var_type: TypeKind,
    pub scope: String,
    pub level: usize,
    pub location: SourceLocation,
}

/// All declarations in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Every declaration of `name`, outermost first in source order
    pub fn lookup<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| s.name == name)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:>5}  {:<16} {:<6} {:>5}", "SCOPE", "LEVEL", "NAME", "TYPE", "LINE")?;
        for s in &self.symbols {
            writeln!(
                f,
                "{:<12} {:>5}  {:<16} {:<6} {:>5}",
                s.scope,
                s.level,
                s.name,
                s.var_type.to_string(),
                s.location.line
            )?;
        }
        Ok(())
    }
}

/// Check declarations and name uses in `program`
pub fn analyze(program: &Program) -> Result<SymbolTable, AnalysisError> {
    let mut checker = Checker {
        scopes: ScopeStack::new(),
        table: SymbolTable::default(),
    };
    checker.check_statements(&program.statements)?;
    debug!(symbols = checker.table.len(), "static check passed");
    Ok(checker.table)
}

struct Checker {
    scopes: ScopeStack,
    table: SymbolTable,
}

impl Checker {
    fn check_statements(&mut self, statements: &[Stmt]) -> Result<(), AnalysisError> {
        statements.iter().try_for_each(|stmt| self.check_statement(stmt))
    }

    fn check_statement(&mut self, stmt: &Stmt) -> Result<(), AnalysisError> {
        match stmt {
            Stmt::VarDecl {
                name,
                var_type,
                init,
                location,
            } => {
                if let Some(expr) = init {
                    self.check_expr(expr)?;
                }
                self.scopes
                    .declare(name, *var_type, None, *location)
                    .map_err(|e| AnalysisError::from_scope(e, *location))?;
                self.table.symbols.push(Symbol {
                    name: name.clone(),
                    var_type: *var_type,
                    scope: self.scopes.current_name().to_string(),
                    level: self.scopes.depth(),
                    location: *location,
                });
                Ok(())
            }
            Stmt::Assignment {
                name,
                value,
                location,
            } => {
                self.check_expr(value)?;
                self.scopes
                    .resolve(name)
                    .map(|_| ())
                    .map_err(|e| AnalysisError::from_scope(e, *location))
            }
            Stmt::Print { expr, .. } => self.check_expr(expr),
            Stmt::If {
                condition,
                then_block,
                else_branch,
                ..
            } => {
                self.check_expr(condition)?;
                self.check_block(then_block)?;
                match else_branch {
                    Some(stmt) => self.check_statement(stmt),
                    None => Ok(()),
                }
            }
            Stmt::While { condition, body, .. } => {
                self.check_expr(condition)?;
                self.check_block(body)
            }
            Stmt::Block(block) => self.check_block(block),
        }
    }

    fn check_block(&mut self, block: &Block) -> Result<(), AnalysisError> {
        self.scopes.push();
        let result = self.check_statements(&block.statements);
        self.scopes.pop();
        result
    }

    fn check_expr(&self, expr: &Expr) -> Result<(), AnalysisError> {
        match expr {
            Expr::IntLiteral(..) | Expr::FloatLiteral(..) => Ok(()),
            Expr::Variable(name, location) => self
                .scopes
                .resolve(name)
                .map(|_| ())
                .map_err(|e| AnalysisError::from_scope(e, *location)),
            Expr::BinaryOp { left, right, .. } => {
                self.check_expr(left)?;
                self.check_expr(right)
            }
            Expr::UnaryOp { operand, .. } => self.check_expr(operand),
        }
    }
}
