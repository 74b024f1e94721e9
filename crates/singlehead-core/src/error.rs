//! Error types for singlehead

use std::path::PathBuf;
use thiserror::Error;

/// Singlehead error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Umbrella file not found: {}", .path.display())]
    UmbrellaNotFound { path: PathBuf },

    #[error("Header '{header}' not found (umbrella line {umbrella_line}: {})", .line.trim_end())]
    HeaderNotFound {
        header: String,
        umbrella_line: usize,
        line: String,
    },

    #[error("Header '{header}' unreadable (umbrella line {umbrella_line}): {source}")]
    HeaderUnreadable {
        header: String,
        umbrella_line: usize,
        source: std::io::Error,
    },

    #[error("Implementation file '{file}' unreadable: {source}")]
    ImplementationUnreadable {
        file: String,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Failed to finalize output: {0}")]
    Persist(String),
}

/// Result type alias for singlehead
pub type Result<T> = std::result::Result<T, Error>;
