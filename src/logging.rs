//! Logging setup
//!
//! The stepper UI owns the terminal, so its logs go to a file:
//! `<tmp>/framegraph-logs/<component>.log` unless a directory is given.
//! Non-interactive commands log compactly to stderr. Both honour `RUST_LOG`
//! and default to `info`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Default log directory in the system temp folder
pub fn default_log_dir() -> PathBuf {
    env::temp_dir().join("framegraph-logs")
}

/// Log to `<dir>/<component>.log`.
///
/// The returned guard flushes the background writer when dropped; keep it
/// alive for as long as logging is needed.
pub fn init_file_logging(component: &str, log_dir: Option<&Path>) -> io::Result<(WorkerGuard, PathBuf)> {
    let dir = log_dir.map_or_else(default_log_dir, Path::to_path_buf);
    fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, format!("{}.log", component));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    tracing::info!(component, log_dir = %dir.display(), "logging initialized");
    Ok((guard, dir))
}

/// Compact logging to stderr for one-shot commands
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
