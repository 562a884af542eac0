//! # Introduction
//!
//! framegraph is a step debugger for teaching. At every pause it draws the
//! call stack and the objects reachable from it as one graph: frames on the
//! left, heap objects to the right, one arrow per reference.
//!
//! ## Pipeline
//!
//! ```text
//! Trace → Stepper → StackSnapshot → Graph → DOT → Graphviz → RasterImage → TUI
//! ```
//!
//! 1. [`memory`]: the host program's object model: [`memory::value::HostValue`]
//!    variants stored by identity in a [`memory::heap::Heap`], plus the raw
//!    [`memory::stack::RawFrame`]s of a pause.
//! 2. [`stepper`]: the single-step state machine over a recorded trace.
//! 3. [`snapshot`]: the filtered, display-ready view of one pause.
//! 4. [`graph`]: builds the deduplicated frame/object graph.
//! 5. [`render`]: emits DOT, runs the layout engine and decodes the image.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//! 7. [`logging`]: `tracing` subscriber setup.

pub mod graph;
pub mod logging;
pub mod memory;
pub mod render;
pub mod snapshot;
pub mod stepper;
pub mod ui;
