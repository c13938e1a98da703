//! Error type for settings loading and watching.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading or watching settings.
#[derive(Debug, Error)]
pub enum Error {
    /// The settings file could not be read.
    #[error("failed to read settings{}: {message}", path_suffix(path))]
    Read {
        /// Offending path, when known.
        path: Option<PathBuf>,
        /// Human-readable cause.
        message: String,
    },
    /// The settings file could not be parsed.
    #[error("failed to parse settings{}: {message}", path_suffix(path))]
    Parse {
        /// Offending path, when known.
        path: Option<PathBuf>,
        /// Human-readable cause.
        message: String,
    },
    /// The file watcher could not be started.
    #[error("failed to watch settings: {0}")]
    Watch(String),
}

/// Render `" at <path>"` for error display, or nothing when unknown.
fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}
