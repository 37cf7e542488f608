//! Error types for buildwatch
//!
//! Library code returns `BuildwatchResult`; the CLI wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildwatch operations
pub type BuildwatchResult<T> = Result<T, BuildwatchError>;

/// Main error type for buildwatch operations
#[derive(Error, Debug)]
pub enum BuildwatchError {
    /// Config file exists but is not valid TOML for our schema
    #[error("invalid config file {file}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Config file was requested explicitly but does not exist
    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Config parsed but holds values the pipeline cannot run with
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A watch could not be opened on a root
    #[error("cannot watch {root}: {message}")]
    Watch { root: PathBuf, message: String },

    /// A watch could not be released cleanly
    #[error("cannot release watch on {root}: {message}")]
    Release { root: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
