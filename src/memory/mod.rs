//! Memory model for the interpreter
//!
//! - [`value`]: Tagged runtime values (Int, Float) and the promotion table
//! - [`scope`]: The lexical scope chain with shadowing
//!
//! # Storage
//!
//! `int` is a signed 64-bit integer and `float` an IEEE double. A variable's
//! declared type is fixed for the lifetime of its binding; every store into it
//! is converted to that type.

pub mod scope;
pub mod value;
