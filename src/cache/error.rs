use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned when persisting the result cache.
///
/// Loading never fails: an unreadable cache degrades to an empty store.
pub enum CacheError {
    /// The cache directory could not be created.
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or renaming the cache file failed.
    #[error("failed to write cache file {path}: {source}")]
    Write {
        /// Target cache path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store could not be serialized.
    #[error("failed to serialize cache store for {path}: {source}")]
    Serialize {
        /// Target cache path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific write failure (in-memory fakes).
    #[error("cache write rejected for key {key}: {reason}")]
    Rejected {
        /// Cache key being written.
        key: String,
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
