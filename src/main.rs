// framegraph: step through a recorded program and watch its frames and objects

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use framegraph::graph::{build_graph, Classifier};
use framegraph::logging;
use framegraph::render::{dot, GraphRenderer, Graphviz};
use framegraph::snapshot::CaptureOptions;
use framegraph::stepper::{RecordedTrace, Stepper};
use framegraph::ui::App;

#[derive(Parser, Debug)]
#[command(name = "framegraph")]
#[command(version, about = "Step through a program and draw its stack and heap as a graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step through a trace interactively
    Step {
        /// Recorded trace (JSON)
        trace: PathBuf,

        /// Source file to display (default: the traced file next to the trace)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Graphviz `dot` executable
        #[arg(long, env = "FRAMEGRAPH_DOT")]
        dot: Option<PathBuf>,

        /// Draw arrays as plain objects
        #[arg(long)]
        no_arrays: bool,

        /// Keep functions and classes bound in frames
        #[arg(long)]
        show_callables: bool,

        /// Render the layout this many times larger before downscaling
        #[arg(long, default_value = "2")]
        supersample: u32,

        /// Log directory (default: <tmp>/framegraph-logs)
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Print the DOT source of one pause
    Dot {
        /// Recorded trace (JSON)
        trace: PathBuf,

        /// Pause to print, counting from 1
        #[arg(long, default_value = "1")]
        event: usize,

        /// Compress the layout into this many pixels wide
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Compress the layout into this many pixels high
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Draw arrays as plain objects
        #[arg(long)]
        no_arrays: bool,

        /// Keep functions and classes bound in frames
        #[arg(long)]
        show_callables: bool,
    },
}

fn classifier(no_arrays: bool) -> Classifier {
    if no_arrays {
        Classifier::without_arrays()
    } else {
        Classifier::new()
    }
}

/// The traced file, resolved next to the trace unless absolute
fn default_source_path(trace: &Path, traced: &str) -> PathBuf {
    let traced = Path::new(traced);
    if traced.is_absolute() {
        return traced.to_path_buf();
    }
    trace
        .parent()
        .map_or_else(|| traced.to_path_buf(), |dir| dir.join(traced))
}

fn run_step(
    trace_path: &Path,
    source: Option<PathBuf>,
    dot: Option<PathBuf>,
    classifier: Classifier,
    capture: CaptureOptions,
    supersample: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let trace = RecordedTrace::load(trace_path)?;
    let filename = trace.filename().to_string();

    let source_path = source.unwrap_or_else(|| default_source_path(trace_path, &filename));
    let source_code = fs::read_to_string(&source_path).map_err(|e| {
        format!("cannot read source '{}': {}", source_path.display(), e)
    })?;

    let engine = Graphviz::locate(dot.as_deref())?;
    let renderer = GraphRenderer::new(engine);
    let stepper = Stepper::new(trace, &filename, capture);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(stepper, renderer, classifier, source_code).with_supersample(supersample);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "session ended");
    }
    res?;
    Ok(())
}

fn run_dot(
    trace_path: &Path,
    event: usize,
    size: Option<(u32, u32)>,
    classifier: Classifier,
    capture: CaptureOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let trace = RecordedTrace::load(trace_path)?;
    let filename = trace.filename().to_string();
    let mut stepper = Stepper::new(trace, &filename, capture);

    let mut pause = None;
    for _ in 0..event.max(1) {
        pause = stepper.advance()?;
        if pause.is_none() {
            break;
        }
    }
    let Some(pause) = pause else {
        return Err(format!("trace has only {} pauses", stepper.steps()).into());
    };

    let graph = build_graph(&pause.snapshot, classifier);
    print!("{}", dot::to_dot(&graph, size));
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Step {
            trace,
            source,
            dot,
            no_arrays,
            show_callables,
            supersample,
            log_dir,
        } => {
            // The TUI owns the terminal; logs go to a file
            let _guard = match logging::init_file_logging("step", log_dir.as_deref()) {
                Ok((guard, _)) => Some(guard),
                Err(e) => {
                    eprintln!("Warning: file logging unavailable: {}", e);
                    None
                }
            };
            let capture = CaptureOptions {
                hide_callables: !show_callables,
            };
            run_step(
                &trace,
                source,
                dot,
                classifier(no_arrays),
                capture,
                supersample,
            )
        }
        Command::Dot {
            trace,
            event,
            width,
            height,
            no_arrays,
            show_callables,
        } => {
            logging::init_stderr_logging();
            let capture = CaptureOptions {
                hide_callables: !show_callables,
            };
            run_dot(
                &trace,
                event,
                width.zip(height),
                classifier(no_arrays),
                capture,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
