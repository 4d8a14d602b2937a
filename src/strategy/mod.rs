//! Inference strategies.
//!
//! Every strategy maps policy text to an [`InferenceResult`] through the
//! [`InferenceMethod`] capability. The set of strategies is closed:
//! [`InferenceStrategy`] holds one variant per method name, and
//! [`StrategyFactory`] resolves names through a fixed constructor table.

pub mod error;
pub mod factory;
pub mod lexical;
pub mod llm;
pub mod pattern;
pub mod rag;
pub mod remote;

#[cfg(test)]
mod tests;

pub use error::{StrategyBuildError, StrategyError};
pub use factory::StrategyFactory;
pub use lexical::LexicalInference;
pub use llm::LlmInference;
pub use pattern::PatternInference;
pub use rag::RagInference;
pub use remote::{
    HttpSuggestionClient, MockSuggestionClient, RawCandidate, RawJustification, RemoteError,
    SuggestionBackend, SuggestionClient, SuggestionResponse, normalize_candidates,
};

use std::future::Future;

use crate::constants::{METHOD_LEXICAL, METHOD_LLM, METHOD_RAG, METHOD_REGEX};
use crate::model::InferenceResult;

/// Maps input text to an audited inference result.
pub trait InferenceMethod: Send + Sync {
    /// Method name recorded in traces.
    fn name(&self) -> &'static str;

    /// Runs the strategy. Deterministic modulo external state (corpus, remote service).
    fn infer(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<InferenceResult, StrategyError>> + Send;
}

#[derive(Debug)]
/// One of the supported strategies.
pub enum InferenceStrategy {
    Lexical(LexicalInference),
    Regex(PatternInference),
    Llm(LlmInference),
    Rag(RagInference),
}

impl InferenceMethod for InferenceStrategy {
    fn name(&self) -> &'static str {
        match self {
            InferenceStrategy::Lexical(_) => METHOD_LEXICAL,
            InferenceStrategy::Regex(_) => METHOD_REGEX,
            InferenceStrategy::Llm(_) => METHOD_LLM,
            InferenceStrategy::Rag(_) => METHOD_RAG,
        }
    }

    async fn infer(&self, text: &str) -> Result<InferenceResult, StrategyError> {
        match self {
            InferenceStrategy::Lexical(s) => s.infer_cached(text),
            InferenceStrategy::Regex(s) => Ok(s.infer_text(text)),
            InferenceStrategy::Llm(s) => s.infer_remote(text).await,
            InferenceStrategy::Rag(s) => s.infer_remote(text).await,
        }
    }
}

impl From<LexicalInference> for InferenceStrategy {
    fn from(s: LexicalInference) -> Self {
        InferenceStrategy::Lexical(s)
    }
}

impl From<PatternInference> for InferenceStrategy {
    fn from(s: PatternInference) -> Self {
        InferenceStrategy::Regex(s)
    }
}

impl From<LlmInference> for InferenceStrategy {
    fn from(s: LlmInference) -> Self {
        InferenceStrategy::Llm(s)
    }
}

impl From<RagInference> for InferenceStrategy {
    fn from(s: RagInference) -> Self {
        InferenceStrategy::Rag(s)
    }
}
