// Constants for the interpreter

/// Default memory budget for the snapshot history (256 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;
