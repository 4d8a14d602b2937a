//! Cached TF-IDF similarity against the reference corpus.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::error::StrategyError;
use crate::cache::ResultCache;
use crate::constants::{
    LEXICAL_MODEL_VERSION, MAX_JUSTIFICATION_DESCRIPTION_CHARS, METHOD_LEXICAL,
};
use crate::hashing::make_cache_key;
use crate::model::{Audit, AuditParameters, CodeSystem, InferenceResult, InferredCode, Justification};
use crate::scoring::text::truncate_chars;
use crate::scoring::{
    CorpusError, ReferenceCorpus, ScoringError, SimilarityScorer, TfidfIndex, normalize_text,
};

const LEXICAL_REASON: &str = "Lexical similarity between policy text and HCPCS description.";

/// Lexical strategy: ranks corpus descriptions by similarity to the query and
/// memoizes results in a [`ResultCache`].
///
/// The cache key covers the method name, the raw query text, the model
/// version, `top_k`, `threshold`, and the corpus checksum.
pub struct LexicalInference {
    corpus: ReferenceCorpus,
    scorer: Arc<dyn SimilarityScorer>,
    cache: Arc<dyn ResultCache>,
    top_k: usize,
    threshold: f64,
}

impl LexicalInference {
    /// Fits a [`TfidfIndex`] over the corpus descriptions.
    pub fn new(
        corpus: ReferenceCorpus,
        cache: Arc<dyn ResultCache>,
        top_k: usize,
        threshold: f64,
    ) -> Self {
        let index = TfidfIndex::fit(corpus.entries().iter().map(|e| e.description.as_str()));
        debug!(
            entries = corpus.len(),
            vocabulary = index.vocabulary_size(),
            checksum = corpus.checksum(),
            "Built lexical index"
        );
        Self::with_scorer(corpus, Arc::new(index), cache, top_k, threshold)
    }

    /// Uses a caller-supplied scorer (must score in corpus order).
    pub fn with_scorer(
        corpus: ReferenceCorpus,
        scorer: Arc<dyn SimilarityScorer>,
        cache: Arc<dyn ResultCache>,
        top_k: usize,
        threshold: f64,
    ) -> Self {
        Self {
            corpus,
            scorer,
            cache,
            top_k,
            threshold,
        }
    }

    /// Loads the corpus CSV and builds the index.
    pub fn from_csv_path(
        path: &Path,
        cache: Arc<dyn ResultCache>,
        top_k: usize,
        threshold: f64,
    ) -> Result<Self, CorpusError> {
        let corpus = ReferenceCorpus::from_csv_path(path)?;
        Ok(Self::new(corpus, cache, top_k, threshold))
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Parameters that determine the output; all of them feed the cache key.
    pub fn key_parameters(&self) -> AuditParameters {
        let mut params = AuditParameters::new();
        params.insert("method_version".into(), LEXICAL_MODEL_VERSION.into());
        params.insert("top_k".into(), self.top_k.into());
        params.insert("threshold".into(), self.threshold.into());
        params.insert("corpus_checksum".into(), self.corpus.checksum().into());
        params
    }

    /// Cache key for `text` under the current parameters.
    pub fn cache_key(&self, text: &str) -> String {
        make_cache_key(METHOD_LEXICAL, text, &self.key_parameters())
    }

    /// Returns the cached result for `text`, or computes, stores, and returns it.
    ///
    /// Every returned audit carries `cache_hit`, `cached_result_key`, and
    /// `cache_path`. A failed cache write is returned as an error.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn infer_cached(&self, text: &str) -> Result<InferenceResult, StrategyError> {
        let key = self.cache_key(text);

        if let Some(mut cached) = self.cache.get(&key) {
            debug!(key = %key, codes = cached.inferred_codes.len(), "Lexical cache hit");
            self.stamp(&mut cached, &key, true);
            return Ok(cached);
        }

        debug!(key = %key, "Lexical cache miss");
        let computed = self.compute(text)?;
        self.cache.put(&key, computed.clone())?;

        let mut result = computed;
        self.stamp(&mut result, &key, false);
        Ok(result)
    }

    /// Scores `text` against the corpus without consulting the cache.
    pub fn compute(&self, text: &str) -> Result<InferenceResult, StrategyError> {
        let query = normalize_text(text);

        let inferred_codes = if query.is_empty() {
            Vec::new()
        } else {
            let scores = self.scorer.score(&query)?;
            if scores.len() != self.corpus.len() {
                return Err(ScoringError::LengthMismatch {
                    expected: self.corpus.len(),
                    actual: scores.len(),
                }
                .into());
            }
            self.rank(&scores)
        };

        let mut params = self.key_parameters();
        params.insert("vectorizer".into(), self.scorer.parameters());

        Ok(InferenceResult::new(
            inferred_codes,
            Audit::now(METHOD_LEXICAL, params),
        ))
    }

    fn rank(&self, scores: &[f32]) -> Vec<InferredCode> {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable: equal scores keep corpus order.
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
        });

        order
            .into_iter()
            .take(self.top_k)
            .filter(|&i| f64::from(scores[i]) >= self.threshold)
            .filter_map(|i| {
                let entry = self.corpus.get(i)?;
                let score = scores[i];
                Some(InferredCode::new(
                    entry.code.clone(),
                    CodeSystem::Hcpcs,
                    score.clamp(0.0, 1.0),
                    Justification::with_details(
                        LEXICAL_REASON,
                        format!(
                            "score={:.4}; matched_description={}",
                            score,
                            truncate_chars(&entry.description, MAX_JUSTIFICATION_DESCRIPTION_CHARS)
                        ),
                    ),
                ))
            })
            .collect()
    }

    fn stamp(&self, result: &mut InferenceResult, key: &str, hit: bool) {
        result.audit.set_parameter("cache_hit", hit);
        result.audit.set_parameter("cached_result_key", key);
        result
            .audit
            .set_parameter("cache_path", Value::String(self.cache.location()));
    }
}

impl std::fmt::Debug for LexicalInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalInference")
            .field("corpus_entries", &self.corpus.len())
            .field("corpus_checksum", &self.corpus.checksum())
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .field("cache", &self.cache.location())
            .finish()
    }
}
