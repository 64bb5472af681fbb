//! Crate-level error wrapping every pipeline stage

use crate::analysis::AnalysisError;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category name for diagnostics (`LexicalError`, `SyntaxError`, `DivisionByZero`, ...)
    pub fn category(&self) -> &'static str {
        match self {
            Error::Parse(e) if e.lexical => "LexicalError",
            Error::Parse(_) => "SyntaxError",
            Error::Analysis(e) => e.category(),
            Error::Runtime(e) => e.category(),
            Error::Io(_) => "IoError",
        }
    }

    /// Source line the error points at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse(e) => Some(e.location.line),
            Error::Analysis(e) => Some(e.location().line),
            Error::Runtime(e) => e.location().map(|l| l.line),
            Error::Io(_) => None,
        }
    }
}
