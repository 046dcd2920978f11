//! Error handling for the indicators-demo crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for demo operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running the demo.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The options file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadConfig {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The options file is not valid JSON.
    #[error("Failed to parse options: {0}")]
    Json(#[from] serde_json::Error),
    /// The options were rejected or the controller could not be built.
    #[error(transparent)]
    Indicators(#[from] widget_indicators::Error),
    /// A line on stdin did not name a known command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
