//! TUI pane rendering modules
//!
//! - [`source`]: Source code with syntax highlighting and the current line marked
//! - [`scopes`]: The live scope chain with each layer's variables
//! - [`terminal`]: Lines printed so far
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a `render_*` function plus any scroll state it
//! keeps between frames.

pub mod scopes;
pub mod source;
pub mod status;
pub mod terminal;

pub use scopes::{render_scopes_pane, ScopesScrollState};
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
