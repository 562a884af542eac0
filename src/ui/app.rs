//! Main TUI application state and logic

use super::panes;
use crate::graph::Classifier;
use crate::render::{
    visualize_frame, GraphRenderer, Graphviz, LayoutEngine, RasterImage, RenderError,
    RenderOptions, RenderTarget,
};
use crate::snapshot::OutputLog;
use crate::stepper::{Pause, PauseKind, Stepper, TraceError, TraceSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::fmt;
use std::io;

/// Errors that end a stepping session
#[derive(Debug)]
pub enum AppError {
    Io(io::Error),
    Render(RenderError),
    Trace(TraceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "terminal error: {}", err),
            AppError::Render(err) => write!(f, "render failed: {}", err),
            AppError::Trace(err) => write!(f, "trace error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::Trace(err) => Some(err),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl From<TraceError> for AppError {
    fn from(err: TraceError) -> Self {
        AppError::Trace(err)
    }
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Graph,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> graph -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Graph,
            FocusedPane::Graph => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Source,
        }
    }
}

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub source: Rect,
    pub output: Rect,
    pub graph: Rect,
    pub status: Rect,
}

/// Split the screen: source over output on the left, graph on the right,
/// status bar along the bottom
pub fn split_panes(area: Rect) -> PaneAreas {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_chunks[0]);

    let left_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(columns[0]);

    PaneAreas {
        source: left_rows[0],
        output: left_rows[1],
        graph: columns[1],
        status: main_chunks[1],
    }
}

/// Rendered image for one pause at one pane size
struct CachedImage {
    step: usize,
    capacity: (u32, u32),
    image: RasterImage,
}

/// The main application state
pub struct App<S: TraceSource, E: LayoutEngine = Graphviz> {
    stepper: Stepper<S>,
    renderer: GraphRenderer<E>,
    classifier: Classifier,
    supersample: u32,

    /// The debugged file's text
    pub source_code: String,

    /// Everything the program printed so far
    pub output: OutputLog,

    /// Latest pause; kept after termination so the last state stays visible
    pub current: Option<Pause>,

    cached: Option<CachedImage>,

    pub focused_pane: FocusedPane,
    pub source_scroll: panes::SourceScrollState,
    pub output_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,
}

impl<S: TraceSource, E: LayoutEngine> App<S, E> {
    pub fn new(
        stepper: Stepper<S>,
        renderer: GraphRenderer<E>,
        classifier: Classifier,
        source_code: String,
    ) -> Self {
        App {
            stepper,
            renderer,
            classifier,
            supersample: 2,
            source_code,
            output: OutputLog::new(),
            current: None,
            cached: None,
            focused_pane: FocusedPane::Source,
            source_scroll: panes::SourceScrollState::default(),
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Render the layout this many times larger before downscaling
    pub fn with_supersample(mut self, factor: u32) -> Self {
        self.supersample = factor.max(1);
        self
    }

    pub fn stepper(&self) -> &Stepper<S> {
        &self.stepper
    }

    /// Run the TUI application until the user quits.
    ///
    /// Stepping or rendering failures end the loop with an error.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        self.step_forward()?;

        loop {
            let mut failure = None;
            terminal.draw(|f| {
                if let Err(err) = self.render(f) {
                    failure = Some(err);
                }
            })?;
            if let Some(err) = failure {
                return Err(err.into());
            }

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key)?;
                }
            }
        }

        Ok(())
    }

    /// Advance the stepper by one pause
    pub fn step_forward(&mut self) -> Result<(), TraceError> {
        if self.stepper.is_terminated() {
            self.status_message = "Program finished".to_string();
            return Ok(());
        }

        match self.stepper.advance()? {
            Some(pause) => {
                self.output.append(&pause.stdout);
                self.status_message = match pause.kind {
                    PauseKind::Line => format!("Paused at line {}", pause.line),
                    PauseKind::Return => format!("Returning from line {}", pause.line),
                };
                self.current = Some(pause);
            }
            None => {
                self.status_message = "Program finished".to_string();
            }
        }
        // Auto-scroll output to bottom
        self.output_scroll = usize::MAX;
        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) -> Result<(), RenderError> {
        let areas = split_panes(frame.area());
        self.refresh_image(panes::pixel_capacity(areas.graph))?;

        panes::render_source_pane(
            frame,
            areas.source,
            &self.source_code,
            self.stepper.marker(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_output_pane(
            frame,
            areas.output,
            &self.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_graph_pane(
            frame,
            areas.graph,
            self.cached.as_ref().map(|cached| &cached.image),
            "Frames & Objects",
            self.focused_pane == FocusedPane::Graph,
        );

        panes::render_status_bar(
            frame,
            areas.status,
            &self.status_message,
            self.stepper.steps(),
            self.stepper.state(),
        );
        Ok(())
    }

    /// Re-render the graph when the pause or the pane size changed
    fn refresh_image(&mut self, capacity: (u32, u32)) -> Result<(), RenderError> {
        let Some(pause) = &self.current else {
            return Ok(());
        };
        let step = self.stepper.steps();
        if self
            .cached
            .as_ref()
            .is_some_and(|cached| cached.step == step && cached.capacity == capacity)
        {
            return Ok(());
        }

        let (width, height) = capacity;
        if width == 0 || height == 0 {
            self.cached = None;
            return Ok(());
        }

        let options = RenderOptions::fit(width * self.supersample, height * self.supersample);
        let image = visualize_frame(
            &pause.snapshot,
            &RenderTarget::Image,
            &self.renderer,
            self.classifier,
            options,
        )?
        .fit_within(width, height);

        self.cached = Some(CachedImage {
            step,
            capacity,
            image,
        });
        Ok(())
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<(), TraceError> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') | KeyCode::Right | KeyCode::Enter | KeyCode::Char('s') => {
                self.step_forward()?;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
                FocusedPane::Graph => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
                FocusedPane::Graph => {}
            },
            _ => {}
        }
        Ok(())
    }
}
