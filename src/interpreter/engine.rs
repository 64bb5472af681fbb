// Execution engine for the interpreter

use crate::config::Config;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::ScopeStack;
use crate::output::OutputSink;
use crate::parser::ast::*;
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use tracing::{info, warn};

/// Tree-walking interpreter for a parsed program
pub struct Interpreter {
    /// Parsed program; taken out while it is being executed
    pub(crate) program: Program,

    /// Active scope chain
    pub(crate) scopes: ScopeStack,

    /// Everything printed so far
    pub(crate) terminal: MockTerminal,

    /// Optional streaming destination for printed lines
    pub(crate) sink: Option<Box<dyn OutputSink>>,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    /// Snapshot manager for stepping through history
    pub(crate) snapshot_manager: SnapshotManager,

    /// Whether snapshots are recorded at all
    pub(crate) record_history: bool,

    /// Index of the snapshot currently shown
    pub(crate) history_position: usize,

    /// Whether execution has finished (successfully or not)
    pub(crate) finished: bool,

    /// Set once the failing statement has been snapshotted
    pub(crate) failure_recorded: bool,
}

impl Interpreter {
    /// Create an interpreter with the default configuration (no history)
    pub fn new(program: Program) -> Self {
        Self::with_config(program, &Config::default())
    }

    pub fn with_config(program: Program, config: &Config) -> Self {
        Interpreter {
            program,
            scopes: ScopeStack::new(),
            terminal: MockTerminal::new(),
            sink: None,
            current_location: SourceLocation::new(1, 1),
            snapshot_manager: SnapshotManager::new(config.snapshot_limit),
            record_history: config.record_history,
            history_position: 0,
            finished: false,
            failure_recorded: false,
        }
    }

    /// Stream every printed line to `sink` as well as recording it
    pub fn set_output(&mut self, sink: Box<dyn OutputSink>) {
        self.sink = Some(sink);
    }

    /// Run the program from start to finish.
    ///
    /// Stops at the first runtime error; lines printed before it are kept.
    /// Each call starts from an empty scope chain, output and history.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.reset();
        let program = std::mem::take(&mut self.program);
        info!(statements = program.statements.len(), "executing program");

        let result = self
            .take_snapshot()
            .and_then(|_| self.execute_statements(&program.statements));

        self.program = program;
        self.finished = true;

        match &result {
            Ok(()) => info!(
                printed = self.terminal.lines.len(),
                snapshots = self.snapshot_manager.len(),
                "execution finished"
            ),
            Err(e) => {
                warn!(error = %e, "execution halted");
                // Errors outside any block are recorded here
                self.record_failure(e);
            }
        }

        result
    }

    fn reset(&mut self) {
        self.scopes = ScopeStack::new();
        self.terminal = MockTerminal::new();
        self.snapshot_manager = SnapshotManager::new(self.snapshot_manager.memory_limit());
        self.current_location = SourceLocation::new(1, 1);
        self.history_position = 0;
        self.finished = false;
        self.failure_recorded = false;
    }

    /// Snapshot the failing statement while its scope chain is still live
    fn record_failure(&mut self, error: &RuntimeError) {
        if self.failure_recorded || matches!(error, RuntimeError::SnapshotLimitExceeded { .. }) {
            return;
        }
        self.failure_recorded = true;
        if let Err(snap_err) = self.take_snapshot() {
            warn!(error = %snap_err, "could not record final snapshot");
        }
    }

    /// Execute statements in order, stopping at the first error
    pub(crate) fn execute_statements(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute_statement(stmt)?;
        }
        Ok(())
    }

    /// Record `line` in the terminal and forward it to the sink
    pub(crate) fn emit_line(&mut self, line: String, location: SourceLocation) -> Result<(), RuntimeError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(&line).map_err(|e| RuntimeError::OutputFailed {
                message: e.to_string(),
                location,
            })?;
        }
        self.terminal.print(line, location);
        Ok(())
    }

    /// Run `f` inside a fresh scope layer; the layer is popped on every exit path
    pub(crate) fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        self.scopes.push();
        let result = f(self);
        if let Err(e) = &result {
            self.record_failure(e);
        }
        self.scopes.pop();
        result
    }

    // ========== History ==========

    /// Take a snapshot of the current execution state
    pub(crate) fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        if !self.record_history {
            return Ok(());
        }

        let snapshot = Snapshot {
            scopes: self.scopes.clone(),
            terminal: self.terminal.clone(),
            step: self.snapshot_manager.len(),
            source_location: self.current_location,
        };

        self.snapshot_manager
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: self.snapshot_manager.memory_usage(),
                limit: self.snapshot_manager.memory_limit(),
            })?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Move to `location` and snapshot there
    pub(crate) fn snapshot_at(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.current_location = location;
        self.take_snapshot()
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .get(index)
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: "Snapshot not found in history".to_string(),
                location: self.current_location,
            })?;

        self.scopes = snapshot.scopes.clone();
        self.terminal = snapshot.terminal.clone();
        self.current_location = snapshot.source_location;
        self.history_position = snapshot.step;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
                location: self.current_location,
            });
        }
        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the end of execution".to_string(),
                location: self.current_location,
            });
        }
        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        if self.snapshot_manager.is_empty() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            });
        }
        self.restore_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        match self.snapshot_manager.len() {
            0 => Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            }),
            n => self.restore_snapshot(n - 1),
        }
    }

    // ========== Getter methods ==========

    /// Lines printed so far, one per `print`
    pub fn output(&self) -> Vec<String> {
        self.terminal.get_output()
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn terminal(&self) -> &MockTerminal {
        &self.terminal
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn recording(source: &str) -> Interpreter {
        let program = parse_source(source).unwrap();
        Interpreter::with_config(program, &Config::default().with_history(true))
    }

    #[test]
    fn test_history_not_recorded_by_default() {
        let mut interp = Interpreter::new(parse_source("int x; x = 1; print(x);").unwrap());
        interp.run().unwrap();
        assert_eq!(interp.total_snapshots(), 0);
        assert_eq!(interp.output(), vec!["1"]);
        assert!(interp.is_finished());
    }

    #[test]
    fn test_step_through_history() {
        let mut interp = recording("int x;\nx = 5;\nprint(x);");
        interp.run().unwrap();

        // initial + three statements
        assert_eq!(interp.total_snapshots(), 4);
        assert_eq!(interp.history_position(), 3);

        interp.rewind_to_start().unwrap();
        assert!(interp.output().is_empty());
        assert!(interp.step_backward().is_err());

        interp.step_forward().unwrap();
        interp.step_forward().unwrap();
        assert_eq!(interp.current_location().line, 2);
        assert_eq!(
            interp.scopes().resolve("x").unwrap().value,
            crate::memory::value::Value::Int(5)
        );

        interp.jump_to_end().unwrap();
        assert_eq!(interp.output(), vec!["5"]);
        assert!(interp.step_forward().is_err());
    }

    #[test]
    fn test_error_leaves_final_snapshot_at_failure() {
        let mut interp = recording("int x;\nprint(x);\nx = 1 / 0;\nprint(2);");
        assert!(interp.run().is_err());
        interp.jump_to_end().unwrap();
        assert_eq!(interp.current_location().line, 3);
        assert_eq!(interp.output(), vec!["0"]);
    }

    #[test]
    fn test_error_inside_block_keeps_block_scope() {
        let mut interp = recording("int x;\n{\n  int y;\n  y = 7;\n  y = y / 0;\n}");
        assert!(matches!(interp.run(), Err(RuntimeError::DivisionByZero { .. })));
        assert_eq!(interp.scopes().depth(), 0);

        interp.jump_to_end().unwrap();
        assert_eq!(interp.current_location().line, 5);
        assert_eq!(interp.scopes().depth(), 1);
        assert_eq!(interp.scopes().current_name(), "block_1");
        assert_eq!(
            interp.scopes().resolve("y").unwrap().value,
            crate::memory::value::Value::Int(7)
        );

        interp.step_backward().unwrap();
        assert_eq!(interp.current_location().line, 4);
    }

    #[test]
    fn test_error_in_nested_loop_body_recorded_once() {
        let mut interp = recording("int i;\nwhile (i < 5) {\n  {\n    int d = 3 - i;\n    print(6 / d);\n  }\n  i = i + 1;\n}");
        assert!(interp.run().is_err());
        assert_eq!(interp.output(), vec!["2", "3", "6"]);

        interp.jump_to_end().unwrap();
        assert_eq!(interp.current_location().line, 5);
        assert_eq!(interp.scopes().resolve("d").unwrap().value, crate::memory::value::Value::Int(0));

        interp.step_backward().unwrap();
        assert_eq!(interp.current_location().line, 4);
    }

    #[test]
    fn test_run_twice_starts_fresh() {
        let mut interp = recording("int x;\nprint(1);");
        interp.run().unwrap();
        let snapshots = interp.total_snapshots();

        interp.run().unwrap();
        assert_eq!(interp.output(), vec!["1"]);
        assert_eq!(interp.total_snapshots(), snapshots);
        assert_eq!(interp.scopes().depth(), 0);
        assert!(interp.scopes().resolve("x").is_ok());
    }

    #[test]
    fn test_snapshot_limit_exceeded() {
        let program = parse_source("int i; while (i < 1000) { i = i + 1; }").unwrap();
        let config = Config::default().with_history(true).with_snapshot_limit(4096);
        let mut interp = Interpreter::with_config(program, &config);
        assert!(matches!(
            interp.run(),
            Err(RuntimeError::SnapshotLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_output_streams_to_sink() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Shared(Rc<RefCell<Vec<String>>>);
        impl OutputSink for Shared {
            fn emit(&mut self, line: &str) -> std::io::Result<()> {
                self.0.borrow_mut().push(line.to_string());
                Ok(())
            }
        }

        let lines = Rc::new(RefCell::new(Vec::new()));
        let mut interp = Interpreter::new(parse_source("print(1); print(2.5); print(1 / 0);").unwrap());
        interp.set_output(Box::new(Shared(Rc::clone(&lines))));
        assert!(interp.run().is_err());
        assert_eq!(*lines.borrow(), vec!["1", "2.5"]);
    }
}
