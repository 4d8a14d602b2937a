//! Batch runner: method-list parsing and per-document orchestration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::ALLOWED_METHODS;
use crate::orchestrator::{Orchestrator, OrchestratorError, OrchestratorRun};
use crate::strategy::StrategyFactory;

#[derive(Debug, Error)]
/// Errors raised by the batch runner.
pub enum PipelineError {
    #[error("method list is empty (allowed: {allowed})")]
    EmptyMethods { allowed: String },

    #[error("unknown methods: {unknown} (allowed: {allowed})")]
    UnknownMethods { unknown: String, allowed: String },

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("document {index} failed: {source}")]
    Document {
        index: usize,
        #[source]
        source: OrchestratorError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Orchestrator run for one input document.
pub struct DocumentRun {
    /// Zero-based position in the input batch (blank documents keep their slot).
    pub index: usize,
    #[serde(flatten)]
    pub run: OrchestratorRun,
}

fn allowed_list() -> String {
    ALLOWED_METHODS.join(", ")
}

/// Parses a comma-separated method list.
///
/// Names are trimmed and lowercased, blank segments ignored, and duplicates
/// dropped keeping the first occurrence.
pub fn parse_methods(raw: &str) -> Result<Vec<String>, PipelineError> {
    let methods: Vec<String> = raw
        .split(',')
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();

    if methods.is_empty() {
        return Err(PipelineError::EmptyMethods {
            allowed: allowed_list(),
        });
    }

    let unknown: Vec<&str> = methods
        .iter()
        .map(String::as_str)
        .filter(|m| !ALLOWED_METHODS.contains(m))
        .collect();
    if !unknown.is_empty() {
        return Err(PipelineError::UnknownMethods {
            unknown: unknown.join(", "),
            allowed: allowed_list(),
        });
    }

    let mut deduped: Vec<String> = Vec::with_capacity(methods.len());
    for method in methods {
        if !deduped.contains(&method) {
            deduped.push(method);
        }
    }
    Ok(deduped)
}

/// Builds an orchestrator for `methods` from `config`.
pub fn build_orchestrator<S: AsRef<str>>(
    config: &Config,
    methods: &[S],
) -> Result<Orchestrator, PipelineError> {
    let factory = StrategyFactory::from_config(config);
    Ok(Orchestrator::from_methods(methods, &factory)?)
}

/// Runs `orchestrator` over every non-blank document in order.
///
/// Documents are trimmed first. The first failing document aborts the batch.
pub async fn run_documents<I, T>(
    orchestrator: &Orchestrator,
    documents: I,
) -> Result<Vec<DocumentRun>, PipelineError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut runs = Vec::new();

    for (index, document) in documents.into_iter().enumerate() {
        let text = document.as_ref().trim();
        if text.is_empty() {
            debug!(index, "Skipping blank document");
            continue;
        }

        let run = orchestrator
            .run(text)
            .await
            .map_err(|source| PipelineError::Document { index, source })?;
        runs.push(DocumentRun { index, run });
    }

    info!(documents = runs.len(), "Pipeline finished");
    Ok(runs)
}
