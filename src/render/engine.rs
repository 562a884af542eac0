//! Layout engine discovery and invocation
//!
//! Layout is delegated to Graphviz `dot`, run as a child process. The
//! [`LayoutEngine`] trait is the seam: the renderer only needs "DOT in, PNG
//! bytes out", which keeps it testable without Graphviz installed.
//!
//! # Discovery
//!
//! [`Graphviz::locate`] tries, in order:
//! 1. an explicitly configured executable (which must exist if given)
//! 2. every directory on `PATH`
//! 3. well-known install directories, including versioned
//!    `Graphviz*` folders under the Windows program files roots

use super::errors::RenderError;
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Install directories checked after `PATH`
const FALLBACK_DIRS: &[&str] = &[
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/usr/bin",
    "/opt/local/bin",
    r"C:\Program Files\Graphviz\bin",
    r"C:\Program Files (x86)\Graphviz\bin",
];

/// Environment variables naming Windows program files roots
const PROGRAM_FILES_VARS: &[&str] = &["ProgramFiles", "ProgramFiles(x86)"];

/// Something that turns DOT source into PNG bytes
pub trait LayoutEngine {
    fn layout_png(&self, dot: &str) -> Result<Vec<u8>, RenderError>;
}

/// Graphviz `dot` executable
#[derive(Debug, Clone)]
pub struct Graphviz {
    executable: PathBuf,
}

impl Graphviz {
    /// Use a known executable without any lookup
    pub fn new(executable: PathBuf) -> Self {
        Graphviz { executable }
    }

    /// Find `dot`, preferring `explicit` when given
    pub fn locate(explicit: Option<&Path>) -> Result<Self, RenderError> {
        Self::locate_in(explicit, env::var_os("PATH"))
    }

    /// Same as [`Graphviz::locate`] with an explicit `PATH` value
    pub fn locate_in(
        explicit: Option<&Path>,
        path_var: Option<OsString>,
    ) -> Result<Self, RenderError> {
        if let Some(explicit) = explicit {
            if explicit.is_file() {
                tracing::info!(engine = %explicit.display(), "using configured layout engine");
                return Ok(Graphviz::new(explicit.to_path_buf()));
            }
            return Err(RenderError::EngineNotFound {
                searched: vec![explicit.to_path_buf()],
            });
        }

        let exe_name = format!("dot{}", env::consts::EXE_SUFFIX);
        let mut searched = Vec::new();

        let path_dirs: Vec<PathBuf> = path_var
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();
        for dir in path_dirs.into_iter().chain(fallback_dirs()) {
            let candidate = dir.join(&exe_name);
            if candidate.is_file() {
                tracing::info!(engine = %candidate.display(), "located layout engine");
                return Ok(Graphviz::new(candidate));
            }
            searched.push(candidate);
        }

        tracing::warn!(locations = searched.len(), "layout engine not found");
        Err(RenderError::EngineNotFound { searched })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Fixed install locations plus `Graphviz*\bin` under the program files roots
fn fallback_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = FALLBACK_DIRS.iter().map(PathBuf::from).collect();
    for var in PROGRAM_FILES_VARS {
        let Some(root) = env::var_os(var) else {
            continue;
        };
        let Ok(entries) = std::fs::read_dir(&root) else {
            continue;
        };
        let mut versioned: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("Graphviz"))
            .map(|entry| entry.path().join("bin"))
            .collect();
        versioned.sort();
        dirs.extend(versioned);
    }
    dirs
}

impl LayoutEngine for Graphviz {
    fn layout_png(&self, dot: &str) -> Result<Vec<u8>, RenderError> {
        let io_error = |source: io::Error| RenderError::EngineIo {
            engine: self.executable.clone(),
            source,
        };

        let mut child = Command::new(&self.executable)
            .arg("-Tpng")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_error)?;

        // Dropping stdin after the write closes the pipe so dot sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        // Reap the child and drain its pipes on every path
        let output = child.wait_with_output().map_err(io_error)?;

        if !output.status.success() {
            return Err(RenderError::EngineFailed {
                engine: self.executable.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        written.map_err(io_error)?;

        tracing::debug!(bytes = output.stdout.len(), "layout engine produced image");
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_engine_is_not_replaced() {
        let missing = Path::new("/definitely/not/here/dot");
        let err = Graphviz::locate_in(Some(missing), None).unwrap_err();
        match err {
            RenderError::EngineNotFound { searched } => {
                assert_eq!(searched, vec![missing.to_path_buf()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join(format!("dot{}", env::consts::EXE_SUFFIX));
        std::fs::write(&exe, b"").unwrap();

        let found = Graphviz::locate_in(None, Some(dir.path().as_os_str().to_owned())).unwrap();
        assert_eq!(found.executable(), exe.as_path());
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let engine = Graphviz::new(PathBuf::from("/definitely/not/here/dot"));
        let err = engine.layout_png("digraph {}").unwrap_err();
        assert!(matches!(err, RenderError::EngineIo { .. }));
    }
}
