//! Retrieval-augmented code suggestions.

use tracing::debug;

use super::error::StrategyError;
use super::remote::{SuggestionBackend, SuggestionClient, normalize_candidates};
use crate::constants::METHOD_RAG;
use crate::model::{Audit, AuditParameters, InferenceResult, now_iso};

#[derive(Debug, Clone)]
/// Retrieval-backed suggestions, truncated to `top_k` in response order.
pub struct RagInference {
    client: SuggestionClient,
    top_k: usize,
    index_version: String,
}

impl RagInference {
    pub fn new(client: impl Into<SuggestionClient>, top_k: usize, index_version: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            top_k,
            index_version: index_version.into(),
        }
    }

    pub async fn infer_remote(&self, text: &str) -> Result<InferenceResult, StrategyError> {
        let response = self.client.query(text).await?;
        let endpoint = self.client.endpoint();
        let mut inferred_codes = normalize_candidates(endpoint, response.codes)?;
        inferred_codes.truncate(self.top_k);

        debug!(endpoint, codes = inferred_codes.len(), "RAG suggestions received");

        let mut params = AuditParameters::new();
        params.insert("top_k".into(), self.top_k.into());
        params.insert("index_version".into(), self.index_version.clone().into());
        params.insert("endpoint".into(), endpoint.into());
        if let Some(model) = response.model {
            params.insert("model".into(), model.into());
        }
        params.insert("mode".into(), self.client.mode().into());

        Ok(InferenceResult::new(
            inferred_codes,
            Audit {
                timestamp: response.timestamp.unwrap_or_else(now_iso),
                method: METHOD_RAG.to_string(),
                parameters: params,
            },
        ))
    }
}
