//! Snapshot-to-graph walk
//!
//! [`GraphBuilder`] emits the frame block first, then walks every binding in
//! frame order and sorted name order. Objects are materialized recursively and
//! memoized by identity: an object already in the seen-set is not emitted
//! again, which turns shared references into converging edges and cycles into
//! back edges instead of unbounded recursion.
//!
//! Emission order is a pure function of the snapshot, so building the same
//! snapshot twice yields identical node and edge sequences.

use super::kind::{Classifier, ValueKind};
use super::{Edge, FrameBlock, Graph, Grid, ObjectNode, PortId, Slot, SlotRef};
use crate::memory::heap::{Heap, HostObject};
use crate::memory::value::{format_float, ArrayData, HostValue, ObjectId};
use crate::snapshot::{FrameRecord, StackSnapshot};
use rustc_hash::FxHashSet;

/// Largest dimension that still gets an inline element grid
pub const MAX_PREVIEW_DIM: usize = 5;

/// Type label for references whose target is missing from the heap
pub const DANGLING_TYPE_NAME: &str = "?";

/// Build the graph for a snapshot
pub fn build_graph(snapshot: &StackSnapshot, classifier: Classifier) -> Graph {
    GraphBuilder::new(&snapshot.heap)
        .with_classifier(classifier)
        .build(&snapshot.frames)
}

/// Single-use builder holding the per-pass seen-set
pub struct GraphBuilder<'a> {
    heap: &'a Heap,
    classifier: Classifier,
    seen: FxHashSet<ObjectId>,
    graph: Graph,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(heap: &'a Heap) -> Self {
        GraphBuilder {
            heap,
            classifier: Classifier::new(),
            seen: FxHashSet::default(),
            graph: Graph::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Consume the builder and produce the graph for `frames`
    pub fn build(mut self, frames: &[FrameRecord]) -> Graph {
        self.add_frames(frames);
        self.add_roots(frames);
        tracing::debug!(
            frames = frames.len(),
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            "built frame graph"
        );
        self.graph
    }

    fn add_frames(&mut self, frames: &[FrameRecord]) {
        for frame in frames {
            let slots = if frame.bindings.is_empty() {
                // Keep the block visible even without locals
                vec![Slot::placeholder()]
            } else {
                frame
                    .bindings
                    .keys()
                    .enumerate()
                    .map(|(index, name)| Slot::with_port(name.clone(), index))
                    .collect()
            };
            self.graph.frames.push(FrameBlock {
                name: frame.name.clone(),
                slots,
            });
        }
    }

    fn add_roots(&mut self, frames: &[FrameRecord]) {
        for (frame_index, frame) in frames.iter().enumerate() {
            for (slot, id) in frame.bindings.values().enumerate() {
                self.materialize(*id);
                self.graph.edges.push(Edge {
                    from: SlotRef::Frame {
                        frame: frame_index,
                        slot,
                    },
                    to: *id,
                });
            }
        }
    }

    /// Emit the node for `id` and, depth-first, everything it references
    fn materialize(&mut self, id: ObjectId) {
        if !self.seen.insert(id) {
            return;
        }

        let heap = self.heap;
        let Some(object) = heap.get(id) else {
            tracing::warn!(%id, "reference to object missing from heap");
            self.graph.nodes.push(ObjectNode {
                id,
                type_name: DANGLING_TYPE_NAME.to_string(),
                kind: ValueKind::Opaque,
                slots: vec![Slot::labeled("")],
                preview: None,
            });
            return;
        };

        let kind = self.classifier.classify(&object.value);
        let (slots, preview, children) = node_body(object, kind);
        tracing::debug!(%id, ?kind, type_name = object.type_name(), "materialized object");

        self.graph.nodes.push(ObjectNode {
            id,
            type_name: object.type_name().to_string(),
            kind,
            slots,
            preview,
        });

        for (port, child) in children {
            self.materialize(child);
            self.graph.edges.push(Edge {
                from: SlotRef::Object { owner: id, port },
                to: child,
            });
        }
    }
}

type NodeBody = (Vec<Slot>, Option<Grid>, Vec<(PortId, ObjectId)>);

/// Slots, optional preview and outgoing references for one object
fn node_body(object: &HostObject, kind: ValueKind) -> NodeBody {
    match (kind, &object.value) {
        (ValueKind::Scalar, value) => (vec![Slot::labeled(scalar_label(value))], None, Vec::new()),
        (ValueKind::Singleton, value) => {
            (vec![Slot::labeled(scalar_label(value))], None, Vec::new())
        }
        (ValueKind::Sequence { .. }, HostValue::List { items } | HostValue::Tuple { items }) => {
            if items.is_empty() {
                return (vec![Slot::placeholder()], None, Vec::new());
            }
            let slots = (0..items.len()).map(|i| Slot::with_port("", i)).collect();
            let children = items
                .iter()
                .enumerate()
                .map(|(i, child)| (PortId(i), *child))
                .collect();
            (slots, None, children)
        }
        (ValueKind::Mapping, HostValue::Dict { entries }) => {
            if entries.is_empty() {
                return (vec![Slot::placeholder()], None, Vec::new());
            }
            let slots = entries
                .iter()
                .enumerate()
                .map(|(i, (key, _))| Slot::with_port(key.clone(), i))
                .collect();
            let children = entries
                .iter()
                .enumerate()
                .map(|(i, (_, child))| (PortId(i), *child))
                .collect();
            (slots, None, children)
        }
        (ValueKind::SetCollection, HostValue::Set { items }) => {
            // Members are never listed; every edge leaves the count slot
            let slots = vec![Slot::with_port(format!("{{{}}}", items.len()), 0)];
            let children = items.iter().map(|child| (PortId(0), *child)).collect();
            (slots, None, children)
        }
        (ValueKind::MultiDimArray, HostValue::Array(data)) => {
            let mut slots = vec![Slot::labeled(array_header(data))];
            let mut children = Vec::new();
            if let Some(base) = data.base.filter(|base| *base != object.id) {
                slots.push(Slot::with_port("base", 0));
                children.push((PortId(0), base));
            }
            (slots, array_preview(data), children)
        }
        _ => (vec![Slot::labeled("")], None, Vec::new()),
    }
}

fn scalar_label(value: &HostValue) -> String {
    match value {
        HostValue::Int { value } => value.to_string(),
        HostValue::Float { value } => format_float(*value),
        HostValue::Str { value } => value.clone(),
        HostValue::Bool { value: true } => "True".to_string(),
        HostValue::Bool { value: false } => "False".to_string(),
        HostValue::None => "None".to_string(),
        _ => String::new(),
    }
}

/// `3×4: float64`; zero-dimensional arrays show `()`
pub fn array_header(data: &ArrayData) -> String {
    let dims = if data.shape.is_empty() {
        "()".to_string()
    } else {
        data.shape
            .iter()
            .map(|dim| dim.to_string())
            .collect::<Vec<_>>()
            .join("×")
    };
    format!("{}: {}", dims, data.dtype)
}

/// Inline grid for small, non-empty 1-D or 2-D arrays of a concrete dtype
pub fn array_preview(data: &ArrayData) -> Option<Grid> {
    if data.is_empty() || data.dtype == "object" || data.elements.len() != data.len() {
        return None;
    }
    let (rows, cols) = match data.shape.as_slice() {
        [n] => (1, *n),
        [r, c] => (*r, *c),
        _ => return None,
    };
    if rows > MAX_PREVIEW_DIM || cols > MAX_PREVIEW_DIM {
        return None;
    }
    Some(Grid {
        rows,
        cols,
        cells: data.elements.clone(),
    })
}
