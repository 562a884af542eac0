//! Error types for the graph renderer
//!
//! Every [`RenderError`] is fatal for the pass that produced it: the renderer
//! never retries and never degrades to a partial image.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while laying out or rasterizing a graph
#[derive(Debug)]
pub enum RenderError {
    /// No layout engine executable could be located
    EngineNotFound { searched: Vec<PathBuf> },

    /// The layout engine could not be started or talked to
    EngineIo { engine: PathBuf, source: io::Error },

    /// The layout engine ran but reported failure
    EngineFailed {
        engine: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    /// The engine output was not a decodable image
    Decode { message: String },

    /// Rendering straight to a named file is not supported
    UnsupportedTarget { path: PathBuf },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EngineNotFound { searched } => {
                write!(
                    f,
                    "Graphviz 'dot' executable not found (searched {} locations); install Graphviz or pass --dot",
                    searched.len()
                )
            }
            RenderError::EngineIo { engine, source } => {
                write!(f, "Failed to run layout engine {}: {}", engine.display(), source)
            }
            RenderError::EngineFailed {
                engine,
                status,
                stderr,
            } => {
                let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
                write!(
                    f,
                    "Layout engine {} exited with status {}: {}",
                    engine.display(),
                    status,
                    stderr.trim()
                )
            }
            RenderError::Decode { message } => {
                write!(f, "Failed to decode rendered image: {}", message)
            }
            RenderError::UnsupportedTarget { path } => {
                write!(
                    f,
                    "Rendering to a file target ({}) is not supported; render to an in-memory image instead",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::EngineIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<png::DecodingError> for RenderError {
    fn from(err: png::DecodingError) -> Self {
        RenderError::Decode {
            message: err.to_string(),
        }
    }
}
