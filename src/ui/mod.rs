//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus and the
//!   per-pause graph rendering
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   graph, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Stepper`] and a [`GraphRenderer`], then call [`App::run`] to start the
//! event loop.
//!
//! [`Stepper`]: crate::stepper::Stepper
//! [`GraphRenderer`]: crate::render::GraphRenderer
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{App, AppError};
