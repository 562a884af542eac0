//! Cooperative single-step control
//!
//! [`Stepper`] is an explicit state machine driven by one external signal,
//! [`Stepper::advance`]:
//!
//! ```text
//! Running --advance--> PausedAtLine | PausedAtReturn --advance--> ... --> Terminated
//! ```
//!
//! Each advance pulls events from a [`TraceSource`] until one belongs to the
//! debugged file, captures a fresh [`StackSnapshot`] for it and pauses. Nothing
//! runs between advances; the caller renders the pause and waits for the user.
//!
//! On return pauses the returned object is bound as [`RETURN_VALUE_NAME`] in
//! the innermost frame before the snapshot is taken.

pub mod errors;
pub mod trace;

pub use errors::TraceError;
pub use trace::{EventKind, RawEvent, RecordedTrace, TraceFile, TraceSource};

use crate::snapshot::{CaptureOptions, StackSnapshot};
use std::path::{Component, Path, PathBuf};

/// Synthetic binding holding a function's return value
pub const RETURN_VALUE_NAME: &str = "~retval~";

/// Stepper state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Running,
    PausedAtLine { line: usize },
    PausedAtReturn { line: usize },
    Terminated,
}

/// Kind of pause, mirrored by the source marker glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    Line,
    Return,
}

impl PauseKind {
    /// Glyph shown next to the paused line
    pub fn marker(self) -> char {
        match self {
            PauseKind::Line => '>',
            PauseKind::Return => 'R',
        }
    }
}

impl From<EventKind> for PauseKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Line => PauseKind::Line,
            EventKind::Return => PauseKind::Return,
        }
    }
}

/// The single marker shown in the source view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMarker {
    pub line: usize,
    pub glyph: char,
}

/// Everything the display needs for one pause
#[derive(Debug, Clone)]
pub struct Pause {
    pub kind: PauseKind,
    pub line: usize,
    pub snapshot: StackSnapshot,
    /// Program output since the previous pause
    pub stdout: String,
}

/// Single-step state machine over a trace source
pub struct Stepper<S: TraceSource> {
    source: S,
    filename: PathBuf,
    capture: CaptureOptions,
    state: StepState,
    steps: usize,
}

impl<S: TraceSource> Stepper<S> {
    pub fn new(source: S, filename: &str, capture: CaptureOptions) -> Self {
        Stepper {
            source,
            filename: canonic(filename),
            capture,
            state: StepState::Running,
            steps: 0,
        }
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// Number of pauses delivered so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_terminated(&self) -> bool {
        self.state == StepState::Terminated
    }

    /// Marker for the current pause, if paused
    pub fn marker(&self) -> Option<SourceMarker> {
        match self.state {
            StepState::PausedAtLine { line } => Some(SourceMarker {
                line,
                glyph: PauseKind::Line.marker(),
            }),
            StepState::PausedAtReturn { line } => Some(SourceMarker {
                line,
                glyph: PauseKind::Return.marker(),
            }),
            StepState::Running | StepState::Terminated => None,
        }
    }

    /// Run to the next pause in the debugged file.
    ///
    /// Returns `Ok(None)` once the trace is exhausted; the stepper then stays
    /// terminated and further calls are no-ops. A source error also
    /// terminates the stepper.
    pub fn advance(&mut self) -> Result<Option<Pause>, TraceError> {
        if self.is_terminated() {
            return Ok(None);
        }
        self.state = StepState::Running;

        // Output of skipped events still belongs to the next visible pause
        let mut pending_stdout = String::new();
        loop {
            let event = match self.source.next_event() {
                Ok(Some(event)) => event,
                Ok(None) => {
                    self.state = StepState::Terminated;
                    tracing::info!(steps = self.steps, "program finished");
                    return Ok(None);
                }
                Err(err) => {
                    self.state = StepState::Terminated;
                    return Err(err);
                }
            };

            pending_stdout.push_str(&event.stdout);
            if canonic(&event.filename) != self.filename {
                tracing::trace!(filename = %event.filename, line = event.line, "skipping foreign event");
                continue;
            }
            return Ok(Some(self.pause(event, pending_stdout)));
        }
    }

    fn pause(&mut self, mut event: RawEvent, stdout: String) -> Pause {
        let kind = PauseKind::from(event.event);
        if kind == PauseKind::Return {
            if let (Some(frame), Some(value)) = (event.stack.last_mut(), event.return_value) {
                frame.bind(RETURN_VALUE_NAME, value);
            }
        }

        let snapshot = StackSnapshot::capture(&event.stack, event.objects, self.capture);
        self.state = match kind {
            PauseKind::Line => StepState::PausedAtLine { line: event.line },
            PauseKind::Return => StepState::PausedAtReturn { line: event.line },
        };
        self.steps += 1;
        tracing::info!(
            step = self.steps,
            line = event.line,
            ?kind,
            frames = snapshot.depth(),
            "paused"
        );

        Pause {
            kind,
            line: event.line,
            snapshot,
            stdout,
        }
    }
}

/// Normalized form of a file name for comparisons
fn canonic(name: &str) -> PathBuf {
    Path::new(name)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
