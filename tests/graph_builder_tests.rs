// Integration tests for the snapshot-to-graph builder

use framegraph::graph::builder::{array_header, array_preview, DANGLING_TYPE_NAME};
use framegraph::graph::{build_graph, Classifier, Edge, Slot, SlotRef, ValueKind};
use framegraph::graph::PortId;
use framegraph::memory::heap::{Heap, HostObject};
use framegraph::memory::value::{ArrayData, HostValue, ObjectId};
use framegraph::render::dot::to_dot;
use framegraph::snapshot::{FrameRecord, StackSnapshot};

fn int(heap: &mut Heap, value: i64) -> ObjectId {
    heap.alloc(HostValue::Int { value })
}

fn list(heap: &mut Heap, items: Vec<ObjectId>) -> ObjectId {
    heap.alloc(HostValue::List { items })
}

fn array(shape: Vec<usize>, dtype: &str, elements: Vec<&str>) -> ArrayData {
    ArrayData {
        shape,
        dtype: dtype.to_string(),
        elements: elements.into_iter().map(String::from).collect(),
        base: None,
    }
}

fn frame_edge(frame: usize, slot: usize, to: ObjectId) -> Edge {
    Edge {
        from: SlotRef::Frame { frame, slot },
        to,
    }
}

fn object_edge(owner: ObjectId, port: usize, to: ObjectId) -> Edge {
    Edge {
        from: SlotRef::Object {
            owner,
            port: PortId(port),
        },
        to,
    }
}

#[test]
fn test_shared_list_is_drawn_once() {
    // a = b = [1, 2]
    let mut heap = Heap::new();
    let one = int(&mut heap, 1);
    let two = int(&mut heap, 2);
    let shared = list(&mut heap, vec![one, two]);

    let frames = vec![FrameRecord::new("global")
        .with("a", shared)
        .with("b", shared)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.frames.len(), 1);
    let labels: Vec<&str> = graph.frames[0]
        .slots
        .iter()
        .map(|slot| slot.label.as_str())
        .collect();
    assert_eq!(labels, vec!["a", "b"]);

    let ids: Vec<ObjectId> = graph.nodes.iter().map(|node| node.id).collect();
    assert_eq!(ids, vec![shared, one, two]);
    assert_eq!(graph.incoming(shared).count(), 2);

    assert_eq!(
        graph.edges,
        vec![
            object_edge(shared, 0, one),
            object_edge(shared, 1, two),
            frame_edge(0, 0, shared),
            frame_edge(0, 1, shared),
        ]
    );
}

#[test]
fn test_every_identity_appears_once() {
    // x = [n, n, n] with the same int object in every slot
    let mut heap = Heap::new();
    let n = int(&mut heap, 7);
    let xs = list(&mut heap, vec![n, n, n]);

    let frames = vec![
        FrameRecord::new("global").with("n", n).with("xs", xs),
        FrameRecord::new("f").with("m", n),
    ];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.incoming(n).count(), 5);
    assert_eq!(graph.outgoing(xs).count(), 3);
}

#[test]
fn test_self_referencing_list_terminates() {
    let mut heap = Heap::new();
    let id = ObjectId(1);
    heap.insert(HostObject::new(id, HostValue::List { items: vec![id] }));

    let frames = vec![FrameRecord::new("global").with("l", id)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(
        graph.edges,
        vec![object_edge(id, 0, id), frame_edge(0, 0, id)]
    );
}

#[test]
fn test_mutual_references_terminate() {
    let mut heap = Heap::new();
    let a = ObjectId(1);
    let b = ObjectId(2);
    heap.insert(HostObject::new(a, HostValue::List { items: vec![b] }));
    heap.insert(HostObject::new(
        b,
        HostValue::Dict {
            entries: vec![("back".to_string(), a)],
        },
    ));

    let frames = vec![FrameRecord::new("global").with("a", a)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.outgoing(b).next(), Some(&object_edge(b, 0, a)));
    assert_eq!(graph.incoming(a).count(), 2);
}

#[test]
fn test_classification_and_labels() {
    let mut heap = Heap::new();
    let i = int(&mut heap, -3);
    let f = heap.alloc(HostValue::Float { value: 1.0 });
    let s = heap.alloc(HostValue::Str {
        value: "hi".to_string(),
    });
    let t = heap.alloc(HostValue::Bool { value: true });
    let none = heap.alloc(HostValue::None);
    let tup = heap.alloc(HostValue::Tuple { items: vec![i] });
    let obj = heap.alloc_named("Node", HostValue::Object);

    let frames = vec![FrameRecord::new("global")
        .with("f", f)
        .with("i", i)
        .with("n", none)
        .with("o", obj)
        .with("s", s)
        .with("t", t)
        .with("tup", tup)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    let node = |id| graph.node(id).unwrap();
    assert_eq!(node(i).kind, ValueKind::Scalar);
    assert_eq!(node(i).slots, vec![Slot::labeled("-3")]);
    assert_eq!(node(f).slots, vec![Slot::labeled("1.0")]);
    assert_eq!(node(s).slots, vec![Slot::labeled("hi")]);
    assert_eq!(node(t).kind, ValueKind::Singleton);
    assert_eq!(node(t).slots, vec![Slot::labeled("True")]);
    assert_eq!(node(none).slots, vec![Slot::labeled("None")]);
    assert_eq!(node(none).type_name, "NoneType");
    assert_eq!(node(tup).kind, ValueKind::Sequence { mutable: false });
    assert_eq!(node(obj).kind, ValueKind::Opaque);
    assert_eq!(node(obj).type_name, "Node");
    assert_eq!(node(obj).kind.color(), None);
}

#[test]
fn test_empty_containers_get_placeholder() {
    let mut heap = Heap::new();
    let empty_list = list(&mut heap, Vec::new());
    let empty_dict = heap.alloc(HostValue::Dict {
        entries: Vec::new(),
    });

    let frames = vec![FrameRecord::new("global")
        .with("d", empty_dict)
        .with("l", empty_list)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    for id in [empty_list, empty_dict] {
        let node = graph.node(id).unwrap();
        assert_eq!(node.slots, vec![Slot::placeholder()]);
        assert_eq!(graph.outgoing(id).count(), 0);
    }
}

#[test]
fn test_set_shows_count_with_edges_from_one_slot() {
    let mut heap = Heap::new();
    let members: Vec<ObjectId> = (1..=3).map(|v| int(&mut heap, v)).collect();
    let set = heap.alloc(HostValue::Set {
        items: members.clone(),
    });

    let frames = vec![FrameRecord::new("global").with("s", set)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    let node = graph.node(set).unwrap();
    assert_eq!(node.kind, ValueKind::SetCollection);
    assert_eq!(node.slots, vec![Slot::with_port("{3}", 0)]);

    let targets: Vec<ObjectId> = graph.outgoing(set).map(|edge| edge.to).collect();
    assert_eq!(targets, members);
    assert!(graph
        .outgoing(set)
        .all(|edge| matches!(edge.from, SlotRef::Object { port: PortId(0), .. })));
}

#[test]
fn test_dict_slots_follow_insertion_order() {
    let mut heap = Heap::new();
    let v1 = int(&mut heap, 1);
    let v2 = int(&mut heap, 2);
    let dict = heap.alloc(HostValue::Dict {
        entries: vec![("zeta".to_string(), v1), ("alpha".to_string(), v2)],
    });

    let frames = vec![FrameRecord::new("global").with("d", dict)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    let node = graph.node(dict).unwrap();
    assert_eq!(node.kind, ValueKind::Mapping);
    assert_eq!(
        node.slots,
        vec![Slot::with_port("zeta", 0), Slot::with_port("alpha", 1)]
    );
    assert_eq!(
        graph.outgoing(dict).copied().collect::<Vec<_>>(),
        vec![object_edge(dict, 0, v1), object_edge(dict, 1, v2)]
    );
}

#[test]
fn test_small_array_gets_preview() {
    let mut heap = Heap::new();
    let data = array(
        vec![3, 3],
        "float64",
        vec!["1.0", "2.0", "3.0", "4.0", "5.0", "6.0", "7.0", "8.0", "9.0"],
    );
    let id = heap.alloc(HostValue::Array(data));

    let frames = vec![FrameRecord::new("global").with("m", id)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    let node = graph.node(id).unwrap();
    assert_eq!(node.kind, ValueKind::MultiDimArray);
    assert_eq!(node.type_name, "ndarray");
    assert_eq!(node.slots[0].label, "3×3: float64");
    let grid = node.preview.as_ref().unwrap();
    assert_eq!((grid.rows, grid.cols), (3, 3));
    assert_eq!(grid.row(1), ["4.0", "5.0", "6.0"]);
}

#[test]
fn test_large_array_has_header_only() {
    let data = array(vec![50, 50], "int64", Vec::new());
    assert_eq!(array_header(&data), "50×50: int64");
    assert_eq!(array_preview(&data), None);
}

#[test]
fn test_array_preview_rules() {
    // 1-D arrays preview as a single row
    let row = array(vec![3], "int64", vec!["1", "2", "3"]);
    let grid = array_preview(&row).unwrap();
    assert_eq!((grid.rows, grid.cols), (1, 3));

    // Object dtype, empty, 3-D and zero-dimensional arrays never preview
    assert_eq!(array_preview(&array(vec![2], "object", vec!["a", "b"])), None);
    assert_eq!(array_preview(&array(vec![0], "int64", Vec::new())), None);
    assert_eq!(
        array_preview(&array(vec![1, 1, 1], "int64", vec!["1"])),
        None
    );
    let scalar = array(Vec::new(), "int64", vec!["4"]);
    assert_eq!(array_preview(&scalar), None);
    assert_eq!(array_header(&scalar), "(): int64");

    // Elements must cover the whole shape
    assert_eq!(array_preview(&array(vec![2, 2], "int64", vec!["1"])), None);
}

#[test]
fn test_array_view_links_to_base() {
    let mut heap = Heap::new();
    let base = heap.alloc(HostValue::Array(array(vec![10], "int64", Vec::new())));
    let mut view_data = array(vec![2], "int64", vec!["0", "1"]);
    view_data.base = Some(base);
    let view = heap.alloc(HostValue::Array(view_data));

    let frames = vec![FrameRecord::new("global").with("v", view)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    let node = graph.node(view).unwrap();
    assert_eq!(node.slots[1], Slot::with_port("base", 0));
    assert_eq!(
        graph.outgoing(view).copied().collect::<Vec<_>>(),
        vec![object_edge(view, 0, base)]
    );
    assert!(graph.node(base).is_some());
}

#[test]
fn test_array_whose_base_is_itself_has_no_base_slot() {
    let mut heap = Heap::new();
    let id = ObjectId(4);
    let mut data = array(vec![1], "int64", vec!["0"]);
    data.base = Some(id);
    heap.insert(HostObject::new(id, HostValue::Array(data)));

    let frames = vec![FrameRecord::new("global").with("a", id)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.node(id).unwrap().slots.len(), 1);
    assert_eq!(graph.outgoing(id).count(), 0);
}

#[test]
fn test_arrays_fall_back_to_opaque_without_recognizer() {
    let mut heap = Heap::new();
    let id = heap.alloc(HostValue::Array(array(vec![2], "int64", vec!["1", "2"])));
    let frames = vec![FrameRecord::new("global").with("a", id)];
    let snapshot = StackSnapshot::new(frames, heap);

    let graph = build_graph(&snapshot, Classifier::without_arrays());
    let node = graph.node(id).unwrap();
    assert_eq!(node.kind, ValueKind::Opaque);
    assert_eq!(node.preview, None);
    assert_eq!(node.type_name, "ndarray");
    assert!(graph.nodes_of_kind(ValueKind::MultiDimArray).next().is_none());
}

#[test]
fn test_frame_without_bindings_keeps_placeholder() {
    let mut heap = Heap::new();
    let x = int(&mut heap, 1);
    let frames = vec![
        FrameRecord::new("global").with("x", x),
        FrameRecord::new("noargs"),
    ];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.frames.len(), 2);
    assert_eq!(graph.frames[1].name, "noargs");
    assert_eq!(graph.frames[1].slots, vec![Slot::placeholder()]);
}

#[test]
fn test_frames_bind_names_in_sorted_order() {
    let mut heap = Heap::new();
    let z = int(&mut heap, 26);
    let a = int(&mut heap, 1);
    let frames = vec![FrameRecord::new("global").with("zed", z).with("abc", a)];
    let graph = build_graph(&StackSnapshot::new(frames, heap), Classifier::new());

    assert_eq!(graph.frames[0].slots[0].label, "abc");
    assert_eq!(graph.nodes[0].id, a);
    assert_eq!(graph.edges[0], frame_edge(0, 0, a));
}

#[test]
fn test_dangling_reference_becomes_unknown_node() {
    let frames = vec![FrameRecord::new("global").with("ghost", ObjectId(99))];
    let graph = build_graph(&StackSnapshot::new(frames, Heap::new()), Classifier::new());

    let node = graph.node(ObjectId(99)).unwrap();
    assert_eq!(node.type_name, DANGLING_TYPE_NAME);
    assert_eq!(node.kind, ValueKind::Opaque);
    assert_eq!(graph.edges, vec![frame_edge(0, 0, ObjectId(99))]);
}

#[test]
fn test_build_is_deterministic() {
    let mut heap = Heap::new();
    let one = int(&mut heap, 1);
    let inner = list(&mut heap, vec![one]);
    let set = heap.alloc(HostValue::Set {
        items: vec![inner, one],
    });
    let dict = heap.alloc(HostValue::Dict {
        entries: vec![("k".to_string(), set), ("j".to_string(), inner)],
    });

    let frames = vec![
        FrameRecord::new("global").with("d", dict).with("one", one),
        FrameRecord::new("f").with("s", set),
    ];
    let snapshot = StackSnapshot::new(frames, heap);

    let first = build_graph(&snapshot, Classifier::new());
    let second = build_graph(&snapshot, Classifier::new());
    assert_eq!(first, second);
    assert_eq!(to_dot(&first, Some((800, 600))), to_dot(&second, Some((800, 600))));
}
