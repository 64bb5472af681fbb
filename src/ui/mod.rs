//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: render functions for each visible pane (source, scopes,
//!   output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct an [`App`] with an [`Interpreter`] that has already run with
//! history recording enabled, then call [`App::run`] to start the event loop.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
