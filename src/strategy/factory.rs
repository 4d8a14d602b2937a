//! Fixed name → constructor table for strategies.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::error::StrategyBuildError;
use super::remote::{MockSuggestionClient, SuggestionClient};
use super::{InferenceStrategy, LexicalInference, LlmInference, PatternInference, RagInference};
use crate::cache::{JsonFileCache, ResultCache};
use crate::config::Config;
use crate::constants::{ALLOWED_METHODS, METHOD_LEXICAL, METHOD_LLM, METHOD_RAG, METHOD_REGEX};
use crate::scoring::ReferenceCorpus;

type Constructor = fn(&StrategyFactory) -> Result<InferenceStrategy, StrategyBuildError>;

const CONSTRUCTORS: [(&str, Constructor); 4] = [
    (METHOD_LEXICAL, StrategyFactory::lexical),
    (METHOD_REGEX, StrategyFactory::regex),
    (METHOD_LLM, StrategyFactory::llm),
    (METHOD_RAG, StrategyFactory::rag),
];

#[derive(Debug, Clone)]
enum CorpusSource {
    Path(PathBuf),
    Loaded(ReferenceCorpus),
}

/// Builds strategies by method name from shared dependencies.
///
/// Every lexical strategy built by one factory shares the same
/// [`ResultCache`].
#[derive(Clone)]
pub struct StrategyFactory {
    corpus: CorpusSource,
    cache: Arc<dyn ResultCache>,
    top_k: usize,
    threshold: f64,
    llm_endpoint: String,
    rag_endpoint: String,
    rag_top_k: usize,
    rag_index_version: String,
    request_timeout: Duration,
}

impl StrategyFactory {
    /// Factory over the configured corpus file and a [`JsonFileCache`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            corpus: CorpusSource::Path(config.corpus_path.clone()),
            cache: Arc::new(JsonFileCache::new(config.cache_path.clone())),
            top_k: config.top_k,
            threshold: config.threshold,
            llm_endpoint: config.llm_endpoint.clone(),
            rag_endpoint: config.rag_endpoint.clone(),
            rag_top_k: config.rag_top_k,
            rag_index_version: config.rag_index_version.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Replaces the result cache.
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Uses an already-loaded corpus instead of reading a file.
    pub fn with_corpus(mut self, corpus: ReferenceCorpus) -> Self {
        self.corpus = CorpusSource::Loaded(corpus);
        self
    }

    /// Returns the shared result cache.
    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }

    /// Resolves `method` through the constructor table.
    pub fn build(&self, method: &str) -> Result<InferenceStrategy, StrategyBuildError> {
        let constructor = CONSTRUCTORS
            .iter()
            .find(|(name, _)| *name == method)
            .map(|(_, ctor)| *ctor)
            .ok_or_else(|| StrategyBuildError::UnknownMethod {
                method: method.to_string(),
                allowed: ALLOWED_METHODS.join(", "),
            })?;

        debug!(method, "Building strategy");
        constructor(self)
    }

    fn lexical(&self) -> Result<InferenceStrategy, StrategyBuildError> {
        let corpus = match &self.corpus {
            CorpusSource::Path(path) => ReferenceCorpus::from_csv_path(path)?,
            CorpusSource::Loaded(corpus) => corpus.clone(),
        };
        Ok(LexicalInference::new(corpus, Arc::clone(&self.cache), self.top_k, self.threshold).into())
    }

    fn regex(&self) -> Result<InferenceStrategy, StrategyBuildError> {
        Ok(PatternInference::new().into())
    }

    fn llm(&self) -> Result<InferenceStrategy, StrategyBuildError> {
        let client = SuggestionClient::from_endpoint(
            &self.llm_endpoint,
            self.request_timeout,
            MockSuggestionClient::llm(),
        )?;
        Ok(LlmInference::new(client).into())
    }

    fn rag(&self) -> Result<InferenceStrategy, StrategyBuildError> {
        let client = SuggestionClient::from_endpoint(
            &self.rag_endpoint,
            self.request_timeout,
            MockSuggestionClient::rag(),
        )?;
        Ok(RagInference::new(client, self.rag_top_k, self.rag_index_version.clone()).into())
    }
}

impl std::fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("corpus", &self.corpus)
            .field("cache", &self.cache.location())
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .field("llm_endpoint", &self.llm_endpoint)
            .field("rag_endpoint", &self.rag_endpoint)
            .finish()
    }
}
