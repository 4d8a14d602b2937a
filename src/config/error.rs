//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse as a number.
    #[error("invalid value '{value}' for {name}: expected a number")]
    InvalidNumber { name: &'static str, value: String },

    /// A top-k setting was zero.
    #[error("{name} must be at least 1")]
    InvalidTopK { name: &'static str },

    /// Similarity threshold outside `[0, 1]`.
    #[error("invalid threshold {value}: must be between 0 and 1")]
    InvalidThreshold { value: f64 },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// An endpoint setting was blank.
    #[error("{name} must not be empty (use 'mock' for the in-process backend)")]
    EmptyEndpoint { name: &'static str },
}
