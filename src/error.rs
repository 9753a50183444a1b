//! Error types for devloop
//!
//! Uses `thiserror` for library errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devloop operations
pub type DevloopResult<T> = Result<T, DevloopError>;

/// Main error type for devloop operations
#[derive(Error, Debug)]
pub enum DevloopError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid config TOML
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Required command missing from config
    #[error("missing required command '{field}' in {file}")]
    MissingCommand { field: String, file: PathBuf },

    /// Failed to spawn an external command
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Failed to set up or run a filesystem watch
    #[error("filesystem watch error: {0}")]
    Watch(#[from] notify::Error),
}
