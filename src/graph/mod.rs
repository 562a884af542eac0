//! Frame-to-graph model and builder
//!
//! This module turns a [`StackSnapshot`](crate::snapshot::StackSnapshot) into
//! an abstract, typed graph:
//! - [`kind`]: [`ValueKind`] and the ordered [`Classifier`]
//! - [`builder`]: the memoized walk from frame bindings into the heap
//! - [`palette`]: fill colors per kind
//!
//! # Shape of the graph
//!
//! All frames live in one block on the left. Each distinct object identity
//! becomes exactly one [`ObjectNode`]; every reference becomes one [`Edge`]
//! from the slot that holds it to the target's entry port.
//!
//! Ports are always synthetic slot indices ([`PortId`]), never raw key text,
//! so arbitrary dictionary keys and repeated frame names cannot produce
//! clashing or malformed port identifiers downstream.

pub mod builder;
pub mod kind;
pub mod palette;

pub use builder::{build_graph, GraphBuilder};
pub use kind::{Classifier, ValueKind};

use crate::memory::value::ObjectId;

/// Synthetic port number within one node, used as an edge attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub usize);

/// A labeled cell of a frame block or object node
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub label: String,
    pub port: Option<PortId>,
    /// Narrow empty cell standing in for an empty container
    pub placeholder: bool,
}

impl Slot {
    pub fn labeled(label: impl Into<String>) -> Self {
        Slot {
            label: label.into(),
            port: None,
            placeholder: false,
        }
    }

    pub fn with_port(label: impl Into<String>, port: usize) -> Self {
        Slot {
            label: label.into(),
            port: Some(PortId(port)),
            placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Slot {
            label: String::new(),
            port: None,
            placeholder: true,
        }
    }
}

/// One call frame rendered as a header plus one slot per binding
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBlock {
    pub name: String,
    /// One slot per binding in sorted order; a lone placeholder when empty
    pub slots: Vec<Slot>,
}

/// Inline element grid for small arrays
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cell text
    pub cells: Vec<String>,
}

impl Grid {
    pub fn row(&self, index: usize) -> &[String] {
        &self.cells[index * self.cols..(index + 1) * self.cols]
    }
}

/// One distinct heap object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub id: ObjectId,
    pub type_name: String,
    pub kind: ValueKind,
    pub slots: Vec<Slot>,
    pub preview: Option<Grid>,
}

impl ObjectNode {
    /// Slots that can originate edges
    pub fn ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.slots.iter().filter_map(|slot| slot.port)
    }
}

/// Where an edge starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    Frame { frame: usize, slot: usize },
    Object { owner: ObjectId, port: PortId },
}

/// A reference from a slot to an object's entry port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: SlotRef,
    pub to: ObjectId,
}

/// Typed node/edge graph for one pause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub frames: Vec<FrameBlock>,
    /// Objects in emission order
    pub nodes: Vec<ObjectNode>,
    /// Edges in emission order
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Get a node by identity
    pub fn node(&self, id: ObjectId) -> Option<&ObjectNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// All edges ending at `id`
    pub fn incoming(&self, id: ObjectId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.to == id)
    }

    /// All edges leaving object `id`
    pub fn outgoing(&self, id: ObjectId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| {
            matches!(edge.from, SlotRef::Object { owner, .. } if owner == id)
        })
    }

    pub fn nodes_of_kind(&self, kind: ValueKind) -> impl Iterator<Item = &ObjectNode> + '_ {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }
}
