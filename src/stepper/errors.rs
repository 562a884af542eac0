//! Error types for trace loading and stepping

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while reading pause events
#[derive(Debug)]
pub enum TraceError {
    /// The trace file could not be read
    Io { path: PathBuf, source: io::Error },

    /// The trace is not valid trace JSON
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io { path, source } => {
                write!(f, "Failed to read trace {}: {}", path.display(), source)
            }
            TraceError::Parse {
                path: Some(path),
                source,
            } => {
                write!(f, "Invalid trace {}: {}", path.display(), source)
            }
            TraceError::Parse { path: None, source } => {
                write!(f, "Invalid trace: {}", source)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io { source, .. } => Some(source),
            TraceError::Parse { source, .. } => Some(source),
        }
    }
}
