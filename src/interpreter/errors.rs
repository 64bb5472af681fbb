//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors or system errors).
//!
//! All runtime errors are fatal - they halt execution at the first failure.
//! Output already printed before the failure is kept.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Reference to a name with no binding in any enclosing scope
    #[error("Undeclared identifier '{name}' at line {}, column {}", .location.line, .location.column)]
    UndeclaredIdentifier {
        name: String,
        location: SourceLocation,
    },

    /// Second declaration of a name in the same scope layer
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

    /// Operand kind not accepted by an operator or context
    #[error("Type error at line {}, column {}: {message}", .location.line, .location.column)]
    TypeError {
        message: String,
        location: SourceLocation,
    },

    /// Integer division or modulo by zero
    #[error("Division by zero in '{operation}' at line {}, column {}", .location.line, .location.column)]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Integer overflow in arithmetic or in a float to int conversion
    #[error("Integer overflow in {operation} at line {}, column {}", .location.line, .location.column)]
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit} bytes")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History/snapshot operation failed
    #[error("{message}")]
    HistoryOperationFailed {
        message: String,
        location: SourceLocation,
    },

    /// The output sink rejected a printed line
    #[error("Failed to write output at line {}: {message}", .location.line)]
    OutputFailed {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::UndeclaredIdentifier { location, .. } => Some(location),
            RuntimeError::DuplicateDeclaration { location, .. } => Some(location),
            RuntimeError::TypeError { location, .. } => Some(location),
            RuntimeError::DivisionByZero { location, .. } => Some(location),
            RuntimeError::IntegerOverflow { location, .. } => Some(location),
            RuntimeError::HistoryOperationFailed { location, .. } => Some(location),
            RuntimeError::OutputFailed { location, .. } => Some(location),
            RuntimeError::SnapshotLimitExceeded { .. } => None,
        }
    }

    /// Short category name used in diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            RuntimeError::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            RuntimeError::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            RuntimeError::TypeError { .. } => "TypeError",
            RuntimeError::DivisionByZero { .. } => "DivisionByZero",
            RuntimeError::IntegerOverflow { .. } => "IntegerOverflow",
            RuntimeError::SnapshotLimitExceeded { .. } => "SnapshotLimitExceeded",
            RuntimeError::HistoryOperationFailed { .. } => "HistoryError",
            RuntimeError::OutputFailed { .. } => "OutputError",
        }
    }
}
