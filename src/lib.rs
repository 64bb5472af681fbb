//! # Introduction
//!
//! minic parses and executes a small C-like language: `int` and `float`
//! variables, arithmetic, comparisons, `if`/`else`, `while`, nested blocks
//! with shadowing, and a `print` statement. Runs can optionally record a
//! snapshot of the interpreter state after every step, which a terminal UI
//! built with [ratatui](https://docs.rs/ratatui) lets you step through.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → [Checker] → Interpreter → Output / Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`analysis`]: optional static pass over declarations and name uses.
//! 3. [`interpreter`]: walks the AST, executes statements, and captures
//!    [`snapshot::Snapshot`]s when history is enabled.
//! 4. [`memory`]: tagged [`memory::value::Value`]s held in a
//!    [`memory::scope::ScopeStack`].
//! 5. [`snapshot`]: history with a configurable memory limit and a
//!    [`snapshot::MockTerminal`] that records `print` output.
//! 6. [`output`]: sinks that receive printed lines as they happen.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let output = minic::run_source("int t; t = 100; { int t; t = 50; print(t); } print(t);").unwrap();
//! assert_eq!(output, vec!["50", "100"]);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod output;
pub mod parser;
pub mod snapshot;
pub mod ui;

pub use config::Config;
pub use error::Error;

use interpreter::engine::Interpreter;

/// Parse and run `source`, returning every printed line.
///
/// Any failure aborts the run; use [`Interpreter`] directly to keep the
/// partial output of a program that fails at runtime.
pub fn run_source(source: &str) -> Result<Vec<String>, Error> {
    run_source_with(source, &Config::default())
}

/// Like [`run_source`], honouring `config.check`
pub fn run_source_with(source: &str, config: &Config) -> Result<Vec<String>, Error> {
    let program = parser::parse_source(source)?;
    if config.check {
        analysis::analyze(&program)?;
    }

    let mut interpreter = Interpreter::with_config(program, config);
    interpreter.run()?;
    Ok(interpreter.output())
}
