//! Mini C source code parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split into `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! - Types: `int`, `float`
//! - Statements: declarations (optionally initialized), assignments, `print(expr);`,
//!   `if`/`else`/`else if`, `while`, and `{ }` blocks
//! - Expressions: `+ - * / %`, comparisons `== != < <= > >=`, unary `-`, parentheses
//! - Comments: `//` and `/* */`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per binary precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse_source, ParseError, Parser};
