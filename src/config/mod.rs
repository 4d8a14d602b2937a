//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CODEINFER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_RAG_INDEX_VERSION, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_THRESHOLD, DEFAULT_TOP_K,
    MOCK_ENDPOINT,
};

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CODEINFER_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Result cache file. Default: `./.data/cached_results.json`.
    pub cache_path: PathBuf,

    /// Reference corpus CSV (`code`, `description`). Default: `./data/hcpcs.csv`.
    pub corpus_path: PathBuf,

    /// Lexical candidates considered per query. Default: `5`.
    pub top_k: usize,

    /// Minimum lexical similarity kept. Default: `0.25`.
    pub threshold: f64,

    /// LLM suggestion endpoint, or `mock`. Default: `mock`.
    pub llm_endpoint: String,

    /// RAG suggestion endpoint, or `mock`. Default: `mock`.
    pub rag_endpoint: String,

    /// RAG candidates kept per query. Default: `5`.
    pub rag_top_k: usize,

    /// RAG index identifier recorded in audits. Default: `mock-index-v1`.
    pub rag_index_version: String,

    /// Timeout for remote suggestion requests. Default: 10 seconds.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("./.data/cached_results.json"),
            corpus_path: PathBuf::from("./data/hcpcs.csv"),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            llm_endpoint: MOCK_ENDPOINT.to_string(),
            rag_endpoint: MOCK_ENDPOINT.to_string(),
            rag_top_k: DEFAULT_TOP_K,
            rag_index_version: DEFAULT_RAG_INDEX_VERSION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    const ENV_CACHE_PATH: &'static str = "CODEINFER_CACHE_PATH";
    const ENV_CORPUS_PATH: &'static str = "CODEINFER_CORPUS_PATH";
    const ENV_TOP_K: &'static str = "CODEINFER_TOP_K";
    const ENV_THRESHOLD: &'static str = "CODEINFER_THRESHOLD";
    const ENV_LLM_ENDPOINT: &'static str = "CODEINFER_LLM_ENDPOINT";
    const ENV_RAG_ENDPOINT: &'static str = "CODEINFER_RAG_ENDPOINT";
    const ENV_RAG_TOP_K: &'static str = "CODEINFER_RAG_TOP_K";
    const ENV_RAG_INDEX_VERSION: &'static str = "CODEINFER_RAG_INDEX_VERSION";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "CODEINFER_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Malformed numbers are errors naming the variable and value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_path = Self::parse_path_from_env(Self::ENV_CACHE_PATH, defaults.cache_path);
        let corpus_path = Self::parse_path_from_env(Self::ENV_CORPUS_PATH, defaults.corpus_path);
        let top_k = Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let threshold = Self::parse_number_from_env(Self::ENV_THRESHOLD, defaults.threshold)?;
        let llm_endpoint = Self::parse_string_from_env(Self::ENV_LLM_ENDPOINT, defaults.llm_endpoint);
        let rag_endpoint = Self::parse_string_from_env(Self::ENV_RAG_ENDPOINT, defaults.rag_endpoint);
        let rag_top_k = Self::parse_number_from_env(Self::ENV_RAG_TOP_K, defaults.rag_top_k)?;
        let rag_index_version =
            Self::parse_string_from_env(Self::ENV_RAG_INDEX_VERSION, defaults.rag_index_version);
        let request_timeout = Self::parse_number_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        )
        .map(Duration::from_secs)?;

        Ok(Self {
            cache_path,
            corpus_path,
            top_k,
            threshold,
            llm_endpoint,
            rag_endpoint,
            rag_top_k,
            rag_index_version,
            request_timeout,
        })
    }

    /// Validates numeric ranges and paths (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK { name: "top_k" });
        }
        if self.rag_top_k == 0 {
            return Err(ConfigError::InvalidTopK { name: "rag_top_k" });
        }

        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }

        if self.corpus_path.exists() && !self.corpus_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.corpus_path.clone(),
            });
        }

        if self.cache_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.cache_path.clone(),
            });
        }

        if self.llm_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint { name: "llm_endpoint" });
        }
        if self.rag_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint { name: "rag_endpoint" });
        }

        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T: std::str::FromStr>(
        var_name: &'static str,
        default: T,
    ) -> Result<T, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(default),
        }
    }
}
