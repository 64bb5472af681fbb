pub mod binary;
pub mod unary;

// Operators are implemented as `impl Interpreter` blocks; nothing to re-export
