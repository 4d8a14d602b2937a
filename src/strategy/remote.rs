//! Remote code-suggestion boundary.
//!
//! Responses arrive as `{codes: [...], model?, timestamp?}` where each
//! candidate's justification is either a plain string or `{reason, details}`.
//! [`normalize_candidates`] turns both shapes into [`Justification`] so the
//! ambiguity never leaves this module.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::MOCK_ENDPOINT;
use crate::model::{CodeSystem, InferredCode, Justification};

#[derive(Debug, Error)]
/// Errors from the remote suggestion boundary. Every variant names the endpoint.
pub enum RemoteError {
    #[error("failed to build HTTP client for {endpoint}: {source}")]
    ClientBuild {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("undecodable response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },

    #[error("suggestion service {endpoint} unavailable: {reason}")]
    Unavailable { endpoint: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Justification exactly as received: string or structured object.
pub enum RawJustification {
    Text(String),
    Structured {
        reason: String,
        #[serde(default)]
        details: Option<String>,
    },
}

impl Default for RawJustification {
    fn default() -> Self {
        RawJustification::Text(String::new())
    }
}

impl From<RawJustification> for Justification {
    fn from(raw: RawJustification) -> Self {
        match raw {
            RawJustification::Text(reason) => Justification::new(reason),
            RawJustification::Structured { reason, details } => Justification { reason, details },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One candidate as received from the service.
pub struct RawCandidate {
    pub code: String,
    #[serde(default)]
    pub code_system: Option<CodeSystem>,
    pub confidence: f32,
    #[serde(default)]
    pub justification: RawJustification,
}

impl RawCandidate {
    pub fn new(code: &str, confidence: f32, justification: RawJustification) -> Self {
        Self {
            code: code.to_string(),
            code_system: None,
            confidence,
            justification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Response body of the suggestion service.
pub struct SuggestionResponse {
    #[serde(default)]
    pub codes: Vec<RawCandidate>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Validates candidates and converts them into [`InferredCode`]s.
///
/// A blank code or a confidence outside `[0, 1]` makes the whole response
/// malformed.
pub fn normalize_candidates(
    endpoint: &str,
    candidates: Vec<RawCandidate>,
) -> Result<Vec<InferredCode>, RemoteError> {
    candidates
        .into_iter()
        .map(|c| {
            let code = c.code.trim();
            if code.is_empty() {
                return Err(RemoteError::Malformed {
                    endpoint: endpoint.to_string(),
                    reason: "candidate with empty code".to_string(),
                });
            }
            if !c.confidence.is_finite() || !(0.0..=1.0).contains(&c.confidence) {
                return Err(RemoteError::Malformed {
                    endpoint: endpoint.to_string(),
                    reason: format!(
                        "confidence {} for code {} outside [0, 1]",
                        c.confidence, code
                    ),
                });
            }
            Ok(InferredCode::new(
                code,
                c.code_system.unwrap_or_default(),
                c.confidence,
                c.justification.into(),
            ))
        })
        .collect()
}

/// Query capability of a suggestion service.
pub trait SuggestionBackend: Send + Sync {
    /// Sends the policy text and returns the raw response.
    fn query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<SuggestionResponse, RemoteError>> + Send;

    /// Endpoint identity recorded in audits.
    fn endpoint(&self) -> &str;

    /// `true` for in-process responders.
    fn is_mock(&self) -> bool;
}

#[derive(Debug, Clone)]
/// Deterministic in-process responder used when the endpoint is `mock`.
pub struct MockSuggestionClient {
    response: Result<SuggestionResponse, String>,
}

impl MockSuggestionClient {
    /// Always answers `response`.
    pub fn with_response(response: SuggestionResponse) -> Self {
        Self {
            response: Ok(response),
        }
    }

    /// Always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
        }
    }

    /// Canned LLM answer: one ambulance transport code with a plain-string justification.
    pub fn llm() -> Self {
        Self::with_response(SuggestionResponse {
            codes: vec![RawCandidate::new(
                "A0428",
                0.7,
                RawJustification::Text(
                    "Mock LLM: ambulance transport-related language detected.".to_string(),
                ),
            )],
            model: Some("mock-llm-v1".to_string()),
            timestamp: None,
        })
    }

    /// Canned RAG answer: two retrieved codes with structured justifications.
    pub fn rag() -> Self {
        Self::with_response(SuggestionResponse {
            codes: vec![
                RawCandidate::new(
                    "A1234",
                    0.85,
                    RawJustification::Structured {
                        reason: "Matched keywords related to service A.".to_string(),
                        details: Some(
                            "Mock RAG hit: 'service A' found in retrieved context.".to_string(),
                        ),
                    },
                ),
                RawCandidate::new(
                    "B5678",
                    0.75,
                    RawJustification::Structured {
                        reason: "Contextual relevance based on retrieved policy context."
                            .to_string(),
                        details: Some("Mock RAG: similarity score above threshold.".to_string()),
                    },
                ),
            ],
            model: Some("mock-rag-v1".to_string()),
            timestamp: None,
        })
    }
}

impl SuggestionBackend for MockSuggestionClient {
    async fn query(&self, _text: &str) -> Result<SuggestionResponse, RemoteError> {
        self.response
            .clone()
            .map_err(|reason| RemoteError::Unavailable {
                endpoint: MOCK_ENDPOINT.to_string(),
                reason,
            })
    }

    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }

    fn is_mock(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct SuggestionRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP client posting `{"text": ...}` to a suggestion endpoint.
pub struct HttpSuggestionClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSuggestionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RemoteError::ClientBuild {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(Self { endpoint, client })
    }
}

impl SuggestionBackend for HttpSuggestionClient {
    async fn query(&self, text: &str) -> Result<SuggestionResponse, RemoteError> {
        debug!(endpoint = %self.endpoint, text_len = text.len(), "Querying suggestion service");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SuggestionRequest { text })
            .send()
            .await
            .map_err(|source| RemoteError::Request {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<SuggestionResponse>()
            .await
            .map_err(|source| RemoteError::Decode {
                endpoint: self.endpoint.clone(),
                source,
            })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_mock(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
/// Suggestion backend selected from an endpoint string.
pub enum SuggestionClient {
    Mock(MockSuggestionClient),
    Http(HttpSuggestionClient),
}

impl SuggestionClient {
    /// `mock` selects `fallback`; anything else is treated as an HTTP URL.
    pub fn from_endpoint(
        endpoint: &str,
        timeout: Duration,
        fallback: MockSuggestionClient,
    ) -> Result<Self, RemoteError> {
        if endpoint == MOCK_ENDPOINT {
            Ok(SuggestionClient::Mock(fallback))
        } else {
            Ok(SuggestionClient::Http(HttpSuggestionClient::new(
                endpoint, timeout,
            )?))
        }
    }

    /// Returns `"mock"` or `"remote"` for audits.
    pub fn mode(&self) -> &'static str {
        if self.is_mock() { "mock" } else { "remote" }
    }
}

impl From<MockSuggestionClient> for SuggestionClient {
    fn from(client: MockSuggestionClient) -> Self {
        SuggestionClient::Mock(client)
    }
}

impl SuggestionBackend for SuggestionClient {
    async fn query(&self, text: &str) -> Result<SuggestionResponse, RemoteError> {
        match self {
            SuggestionClient::Mock(c) => c.query(text).await,
            SuggestionClient::Http(c) => c.query(text).await,
        }
    }

    fn endpoint(&self) -> &str {
        match self {
            SuggestionClient::Mock(c) => c.endpoint(),
            SuggestionClient::Http(c) => c.endpoint(),
        }
    }

    fn is_mock(&self) -> bool {
        matches!(self, SuggestionClient::Mock(_))
    }
}
