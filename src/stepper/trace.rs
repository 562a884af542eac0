//! Recorded pause events
//!
//! A trace is a JSON document produced by a tracer attached to the debugged
//! program: one entry per line pause or return pause, each carrying the live
//! stack (outermost first) and every object reachable from it.
//!
//! ```json
//! { "filename": "demo.py",
//!   "events": [
//!     { "event": "line", "filename": "demo.py", "line": 2,
//!       "stack": [{ "name": "<module>", "filename": "demo.py", "locals": [["a", 1]] }],
//!       "objects": [{ "id": 1, "value": { "kind": "int", "value": 5 } }],
//!       "stdout": "" } ] }
//! ```

use super::errors::TraceError;
use crate::memory::{heap::Heap, stack::RawFrame, value::ObjectId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Why the program paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Line,
    Return,
}

/// One pause as reported by the tracer, before any filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub event: EventKind,
    pub filename: String,
    pub line: usize,
    pub stack: Vec<RawFrame>,
    #[serde(default)]
    pub objects: Heap,
    #[serde(default)]
    pub return_value: Option<ObjectId>,
    /// Program output written since the previous event
    #[serde(default)]
    pub stdout: String,
}

/// Whole trace document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFile {
    /// The debugged file; events from other files are skipped
    pub filename: String,
    pub events: Vec<RawEvent>,
}

/// Supplier of pause events, one at a time
pub trait TraceSource {
    /// Next event, or `None` once the program has finished
    fn next_event(&mut self) -> Result<Option<RawEvent>, TraceError>;
}

/// Trace replayed from memory
#[derive(Debug)]
pub struct RecordedTrace {
    filename: String,
    total: usize,
    events: std::vec::IntoIter<RawEvent>,
}

impl RecordedTrace {
    pub fn new(filename: &str, events: Vec<RawEvent>) -> Self {
        RecordedTrace {
            filename: filename.to_string(),
            total: events.len(),
            events: events.into_iter(),
        }
    }

    /// Load a trace from a JSON file
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TraceFile = serde_json::from_str(&text).map_err(|source| TraceError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            events = file.events.len(),
            "loaded trace"
        );
        Ok(Self::from(file))
    }

    /// Parse a trace from JSON text
    pub fn from_json(text: &str) -> Result<Self, TraceError> {
        let file: TraceFile =
            serde_json::from_str(text).map_err(|source| TraceError::Parse { path: None, source })?;
        Ok(Self::from(file))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Number of events recorded, including ones already replayed
    pub fn total(&self) -> usize {
        self.total
    }
}

impl From<TraceFile> for RecordedTrace {
    fn from(file: TraceFile) -> Self {
        RecordedTrace::new(&file.filename, file.events)
    }
}

impl TraceSource for RecordedTrace {
    fn next_event(&mut self) -> Result<Option<RawEvent>, TraceError> {
        Ok(self.events.next())
    }
}
