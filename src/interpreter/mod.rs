//! Tree-walking execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Interpreter state, run loop and history navigation
//! - [`errors`]: Runtime error types
//! - `statements` / `loops`: statement execution
//! - `expressions` / `ops`: expression evaluation and operators
//!
//! # Execution Model
//!
//! The interpreter walks the AST and executes statements one at a time
//! against a [`ScopeStack`](crate::memory::scope::ScopeStack). When history
//! recording is enabled, a snapshot is taken after each statement so the
//! viewer can step backward and forward.

pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod loops;
mod ops;
mod statements;
