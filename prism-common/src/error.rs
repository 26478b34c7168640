//! Common error types for PRISM

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for PRISM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the PRISM crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Outline CSV could not be read
    #[error("Outline error: {0}")]
    Outline(#[from] csv::Error),

    /// Record file is readable but is not a usable profile document
    #[error("Malformed record {file}: {reason}")]
    MalformedRecord { file: PathBuf, reason: String },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (bad field path, bad table entry)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
