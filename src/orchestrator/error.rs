use thiserror::Error;

use crate::strategy::{StrategyBuildError, StrategyError};

#[derive(Debug, Error)]
/// Errors raised while building or running an [`super::Orchestrator`].
pub enum OrchestratorError {
    /// No strategies were requested.
    #[error("method list is empty: at least one inference method is required")]
    EmptyMethodList,

    /// A method name could not be resolved to a strategy.
    #[error(transparent)]
    Build(#[from] StrategyBuildError),

    /// A strategy failed; the whole run is aborted.
    #[error("strategy '{method}' failed: {source}")]
    Strategy {
        method: &'static str,
        #[source]
        source: StrategyError,
    },
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
