// Integration tests for loading recorded traces

use std::io::Write;

use framegraph::memory::value::{HostValue, ObjectId};
use framegraph::snapshot::CaptureOptions;
use framegraph::stepper::{EventKind, RecordedTrace, Stepper, TraceError, TraceSource};

const TRACE: &str = r#"{
  "filename": "demo.py",
  "events": [
    { "event": "line", "filename": "demo.py", "line": 3,
      "stack": [ { "name": "<module>", "filename": "demo.py",
                   "locals": [["a", 1], ["b", 1], ["grid", 4], ["d", 5]] } ],
      "objects": [
        { "id": 1, "type": "list", "value": { "kind": "list", "items": [2, 3] } },
        { "id": 2, "value": { "kind": "int", "value": 1 } },
        { "id": 3, "value": { "kind": "float", "value": 2.5 } },
        { "id": 4, "value": { "kind": "array", "shape": [2, 2], "dtype": "int64",
                              "elements": ["1", "2", "3", "4"] } },
        { "id": 5, "value": { "kind": "dict", "entries": [["k", 6]] } },
        { "id": 6, "value": { "kind": "none" } }
      ],
      "stdout": "" },
    { "event": "return", "filename": "demo.py", "line": 5,
      "stack": [ { "name": "<module>", "filename": "demo.py" } ],
      "objects": [ { "id": 9, "value": { "kind": "bool", "value": true } } ],
      "return_value": 9,
      "stdout": "done\n" }
  ]
}"#;

#[test]
fn test_parse_trace_document() {
    let mut trace = RecordedTrace::from_json(TRACE).unwrap();
    assert_eq!(trace.filename(), "demo.py");
    assert_eq!(trace.total(), 2);

    let first = trace.next_event().unwrap().unwrap();
    assert_eq!(first.event, EventKind::Line);
    assert_eq!(first.stack[0].locals[2], ("grid".to_string(), ObjectId(4)));
    assert_eq!(first.objects.len(), 6);
    assert_eq!(first.objects.get(ObjectId(1)).unwrap().type_name(), "list");
    assert_eq!(first.objects.get(ObjectId(2)).unwrap().type_name(), "int");
    assert_eq!(
        first.objects.get(ObjectId(6)).unwrap().value,
        HostValue::None
    );
    match &first.objects.get(ObjectId(4)).unwrap().value {
        HostValue::Array(data) => {
            assert_eq!(data.shape, vec![2, 2]);
            assert_eq!(data.elements.len(), data.len());
            assert_eq!(data.base, None);
        }
        other => panic!("expected an array, got {:?}", other),
    }

    let second = trace.next_event().unwrap().unwrap();
    assert_eq!(second.event, EventKind::Return);
    assert_eq!(second.return_value, Some(ObjectId(9)));
    assert!(second.stack[0].locals.is_empty());

    assert!(trace.next_event().unwrap().is_none());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TRACE.as_bytes()).unwrap();

    let trace = RecordedTrace::load(file.path()).unwrap();
    let filename = trace.filename().to_string();
    let mut stepper = Stepper::new(trace, &filename, CaptureOptions::default());

    let first = stepper.advance().unwrap().unwrap();
    assert_eq!(first.snapshot.frames[0].bindings.len(), 4);

    let second = stepper.advance().unwrap().unwrap();
    assert_eq!(second.stdout, "done\n");
    assert_eq!(
        second.snapshot.frames[0].bindings.get("~retval~"),
        Some(&ObjectId(9))
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = RecordedTrace::load(&path).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_invalid_json_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"filename\": \"demo.py\", \"events\": [ { \"event\": \"jump\" } ] }")
        .unwrap();

    let err = RecordedTrace::load(file.path()).unwrap_err();
    match err {
        TraceError::Parse { path, .. } => assert_eq!(path.as_deref(), Some(file.path())),
        other => panic!("expected a parse error, got {}", other),
    }
}

#[test]
fn test_demo_trace_steps_to_completion() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/aliasing.trace.json");
    let trace = RecordedTrace::load(&path).unwrap();
    assert_eq!(trace.filename(), "aliasing.py");

    let mut stepper = Stepper::new(trace, "aliasing.py", CaptureOptions::default());
    let mut pauses = Vec::new();
    while let Some(pause) = stepper.advance().unwrap() {
        pauses.push(pause);
    }
    assert_eq!(pauses.len(), 10);
    assert!(stepper.is_terminated());

    // The function object itself is never bound in a frame
    assert!(pauses
        .iter()
        .all(|p| !p.snapshot.frames[0].bindings.contains_key("append_twice")));

    // xs and ys alias the same list inside the call
    let in_call = &pauses[4].snapshot;
    assert_eq!(in_call.depth(), 2);
    assert_eq!(in_call.frames[0].bindings["xs"], in_call.frames[0].bindings["ys"]);
    assert_eq!(in_call.frames[1].bindings["items"], in_call.frames[0].bindings["xs"]);

    let last = pauses.last().unwrap();
    assert_eq!(last.stdout, "4\n");
}

#[test]
fn test_largest_object_id_loads() {
    let text = r#"{ "filename": "demo.py", "events": [
        { "event": "line", "filename": "demo.py", "line": 1,
          "stack": [ { "name": "<module>", "filename": "demo.py",
                       "locals": [["big", 18446744073709551615]] } ],
          "objects": [ { "id": 18446744073709551615,
                         "value": { "kind": "int", "value": 7 } } ] } ] }"#;

    let trace = RecordedTrace::from_json(text).unwrap();
    let mut stepper = Stepper::new(trace, "demo.py", CaptureOptions::default());
    let pause = stepper.advance().unwrap().unwrap();

    let id = ObjectId(u64::MAX);
    assert_eq!(pause.snapshot.frames[0].bindings["big"], id);
    assert_eq!(
        pause.snapshot.heap.get(id).unwrap().value,
        HostValue::Int { value: 7 }
    );
}
