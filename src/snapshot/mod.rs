// Stack snapshots captured at each pause

use crate::memory::{heap::Heap, stack::RawFrame, value::ObjectId};
use std::collections::BTreeMap;

/// Name the outermost frame is always shown under
pub const GLOBAL_FRAME_NAME: &str = "global";

/// Filtering applied while capturing a snapshot
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Drop bindings to functions and classes so only plain data is drawn
    pub hide_callables: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        CaptureOptions {
            hide_callables: true,
        }
    }
}

/// One frame of a snapshot: display name plus its visible bindings
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub name: String,
    pub bindings: BTreeMap<String, ObjectId>, // Sorted, so iteration is lexicographic
}

impl FrameRecord {
    pub fn new(name: &str) -> Self {
        FrameRecord {
            name: name.to_string(),
            bindings: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, id: ObjectId) -> Self {
        self.bindings.insert(name.to_string(), id);
        self
    }
}

/// Immutable capture of the call stack and heap at one pause
#[derive(Debug, Clone, PartialEq)]
pub struct StackSnapshot {
    /// Outermost (global) first, innermost (current) last
    pub frames: Vec<FrameRecord>,
    pub heap: Heap,
}

impl StackSnapshot {
    pub fn new(frames: Vec<FrameRecord>, heap: Heap) -> Self {
        StackSnapshot { frames, heap }
    }

    /// Capture a snapshot from the live stack, outermost frame first.
    ///
    /// Only the innermost run of frames sharing the current frame's file is
    /// kept. Dunder names are always dropped; callables are dropped when
    /// `options.hide_callables` is set. The outermost kept frame is renamed
    /// [`GLOBAL_FRAME_NAME`].
    pub fn capture(stack: &[RawFrame], heap: Heap, options: CaptureOptions) -> Self {
        let Some(innermost) = stack.last() else {
            return StackSnapshot::new(Vec::new(), heap);
        };

        let first_kept = stack
            .iter()
            .rposition(|frame| frame.filename != innermost.filename)
            .map_or(0, |pos| pos + 1);

        let mut frames: Vec<FrameRecord> = stack[first_kept..]
            .iter()
            .map(|raw| FrameRecord {
                name: raw.name.clone(),
                bindings: raw
                    .locals
                    .iter()
                    .filter(|(name, id)| is_visible(name, *id, &heap, options))
                    .map(|(name, id)| (name.clone(), *id))
                    .collect(),
            })
            .collect();

        if let Some(outermost) = frames.first_mut() {
            outermost.name = GLOBAL_FRAME_NAME.to_string();
        }

        StackSnapshot::new(frames, heap)
    }

    /// Get the current (innermost) frame
    pub fn current_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

fn is_visible(name: &str, id: ObjectId, heap: &Heap, options: CaptureOptions) -> bool {
    if name.starts_with("__") {
        return false;
    }
    if options.hide_callables {
        if let Some(object) = heap.get(id) {
            return !object.value.is_callable();
        }
    }
    true
}

/// Program output captured alongside the pauses
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    text: String,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of output produced since the previous pause
    pub fn append(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// Get all output as lines
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.text.split('\n').collect();
        // A trailing newline does not start a visible line
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
