// Snapshot management for stepping through execution history

use crate::memory::scope::ScopeStack;
use crate::parser::ast::SourceLocation;

/// Mock terminal capturing `print` output
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub lines: Vec<TerminalLine>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { lines: Vec::new() }
    }

    /// Record one printed line
    pub fn print(&mut self, text: String, location: SourceLocation) {
        self.lines.push(TerminalLine { text, location });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|tl| tl.text.clone()).collect()
    }
}

/// A line of terminal output with source location tracking
#[derive(Debug, Clone)]
pub struct TerminalLine {
    pub text: String,
    pub location: SourceLocation,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub scopes: ScopeStack,
    pub terminal: MockTerminal,
    pub step: usize,
    pub source_location: SourceLocation,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let terminal_size: usize = self
            .terminal
            .lines
            .iter()
            .map(|l| l.text.len() + std::mem::size_of::<TerminalLine>())
            .sum();

        std::mem::size_of::<Snapshot>() + self.scopes.estimated_size() + terminal_size
    }
}

/// Manages execution history
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: usize) -> Snapshot {
        Snapshot {
            scopes: ScopeStack::new(),
            terminal: MockTerminal::new(),
            step,
            source_location: SourceLocation::new(step + 1, 1),
        }
    }

    #[test]
    fn test_push_and_get() {
        let mut manager = SnapshotManager::new(usize::MAX);
        manager.push(snapshot(0)).unwrap();
        manager.push(snapshot(1)).unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|s| s.step), Some(1));
        assert!(manager.get(2).is_none());
        assert!(manager.memory_usage() > 0);
    }

    #[test]
    fn test_memory_limit_enforced() {
        let size = snapshot(0).estimated_size();
        let mut manager = SnapshotManager::new(size);
        manager.push(snapshot(0)).unwrap();
        assert!(manager.push(snapshot(1)).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_terminal_keeps_one_line_per_print() {
        let mut terminal = MockTerminal::new();
        terminal.print("1".to_string(), SourceLocation::new(1, 1));
        terminal.print("2".to_string(), SourceLocation::new(1, 1));
        assert_eq!(terminal.get_output(), vec!["1", "2"]);
    }
}
