//! LLM-backed code suggestions.

use tracing::debug;

use super::error::StrategyError;
use super::remote::{SuggestionBackend, SuggestionClient, normalize_candidates};
use crate::constants::METHOD_LLM;
use crate::model::{Audit, AuditParameters, InferenceResult, now_iso};

const UNKNOWN_MODEL: &str = "unknown";

#[derive(Debug, Clone)]
/// Delegates to a suggestion service and normalizes its answer.
pub struct LlmInference {
    client: SuggestionClient,
}

impl LlmInference {
    pub fn new(client: impl Into<SuggestionClient>) -> Self {
        Self {
            client: client.into(),
        }
    }

    pub async fn infer_remote(&self, text: &str) -> Result<InferenceResult, StrategyError> {
        let response = self.client.query(text).await?;
        let endpoint = self.client.endpoint();
        let inferred_codes = normalize_candidates(endpoint, response.codes)?;

        debug!(endpoint, codes = inferred_codes.len(), "LLM suggestions received");

        let mut params = AuditParameters::new();
        params.insert("endpoint".into(), endpoint.into());
        params.insert(
            "model".into(),
            response.model.as_deref().unwrap_or(UNKNOWN_MODEL).into(),
        );
        params.insert("mode".into(), self.client.mode().into());

        Ok(InferenceResult::new(
            inferred_codes,
            Audit {
                timestamp: response.timestamp.unwrap_or_else(now_iso),
                method: METHOD_LLM.to_string(),
                parameters: params,
            },
        ))
    }
}
