//! Procedure-code inference library (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`InferredCode`], [`InferenceResult`], [`Audit`] - Audited strategy output
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//!
//! ## Inference
//! - [`InferenceMethod`], [`InferenceStrategy`] - Strategy capability and its closed set of variants
//! - [`StrategyFactory`] - Name to strategy resolution
//! - [`Orchestrator`], [`merge_results`] - Sequential run and deterministic merge
//!
//! ## Caching
//! - [`ResultCache`], [`JsonFileCache`], [`CacheStore`] - Content-addressed result memoization
//! - [`make_cache_key`] - Cache key derivation
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod hashing;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod scoring;
pub mod strategy;

#[cfg(any(test, feature = "mock"))]
pub use cache::MemoryResultCache;
pub use cache::{CacheError, CacheStore, JsonFileCache, ResultCache};
pub use config::{Config, ConfigError};
pub use hashing::{hash_text, make_cache_key};
pub use model::{Audit, CodeSystem, InferenceResult, InferredCode, Justification};
pub use orchestrator::{Orchestrator, OrchestratorError, OrchestratorRun, merge_results};
pub use pipeline::{DocumentRun, PipelineError, parse_methods, run_documents};
pub use scoring::{CorpusEntry, ReferenceCorpus, SimilarityScorer, TfidfIndex};
pub use strategy::{
    InferenceMethod, InferenceStrategy, StrategyBuildError, StrategyError, StrategyFactory,
};
