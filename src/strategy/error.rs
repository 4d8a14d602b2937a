use thiserror::Error;

use super::remote::RemoteError;
use crate::cache::CacheError;
use crate::scoring::{CorpusError, ScoringError};

#[derive(Debug, Error)]
/// Errors raised while a strategy is inferring codes.
pub enum StrategyError {
    /// The similarity scorer failed.
    #[error("similarity scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    /// The computed result could not be persisted to the cache.
    #[error("cache write failed: {0}")]
    Cache(#[from] CacheError),

    /// The remote suggestion service failed or answered malformed data.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Error)]
/// Errors raised while constructing a strategy by name.
pub enum StrategyBuildError {
    /// No constructor is registered under this name.
    #[error("unknown inference method '{method}' (allowed: {allowed})")]
    UnknownMethod { method: String, allowed: String },

    /// The reference corpus could not be loaded.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// The remote client could not be built.
    #[error(transparent)]
    Client(#[from] RemoteError),
}
