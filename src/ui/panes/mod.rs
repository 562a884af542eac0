//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code with syntax highlighting and the pause marker
//! - [`graph`]: The rendered frame graph, drawn with half-block cells
//! - [`output`]: Program output captured alongside the pauses
//! - [`status`]: Status bar with keybindings and stepper state
//!
//! Each pane module exports a stateless `render_*` function; scroll state
//! lives in [`crate::ui::App`].

pub mod graph;
pub mod output;
pub mod source;
pub mod status;

pub use graph::{pixel_capacity, render_graph_pane};
pub use output::render_output_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
