//! Host object model
//!
//! This module provides the runtime-side abstractions the graph is built from:
//! - [`value`]: Tagged value shapes ([`value::HostValue`]) and identities ([`value::ObjectId`])
//! - [`heap`]: Identity-keyed object arena captured at each pause
//! - [`stack`]: Unfiltered live frames as reported by the stepping collaborator
//!
//! # Identity
//!
//! Objects refer to each other only through [`value::ObjectId`]. The graph
//! builder deduplicates on these ids, so two bindings to the same id render as
//! one node with two incoming edges, while two equal lists under different ids
//! render as two nodes.

pub mod heap;
pub mod stack;
pub mod value;
