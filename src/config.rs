//! Run configuration

use crate::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;

/// Options controlling a single run of the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Record a snapshot after every step (needed by the viewer)
    pub record_history: bool,
    /// Memory budget for recorded snapshots, in bytes
    pub snapshot_limit: usize,
    /// Run the static checker before executing
    pub check: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            record_history: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            check: false,
        }
    }

    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = limit;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
