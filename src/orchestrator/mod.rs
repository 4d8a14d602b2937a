//! Runs an ordered list of strategies and merges their outputs.
//!
//! Strategies run sequentially in list order. Any strategy failure aborts the
//! run; a partial merge is never returned.

pub mod error;
pub mod merge;
pub mod types;


pub use error::{OrchestratorError, OrchestratorResult};
pub use merge::merge_results;
pub use types::{MethodOutput, OrchestratorRun};

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::constants::ORCHESTRATOR_METHOD;
use crate::model::{Audit, AuditParameters, InferenceResult};
use crate::strategy::{InferenceMethod, InferenceStrategy, StrategyFactory};

#[derive(Debug)]
/// Non-empty, ordered list of strategies.
pub struct Orchestrator {
    strategies: Vec<InferenceStrategy>,
}

impl Orchestrator {
    /// Takes ownership of already-built strategies.
    pub fn new(strategies: Vec<InferenceStrategy>) -> OrchestratorResult<Self> {
        if strategies.is_empty() {
            return Err(OrchestratorError::EmptyMethodList);
        }
        Ok(Self { strategies })
    }

    /// Resolves every name through `factory`.
    ///
    /// Duplicate names build independent instances.
    pub fn from_methods<S: AsRef<str>>(
        methods: &[S],
        factory: &StrategyFactory,
    ) -> OrchestratorResult<Self> {
        if methods.is_empty() {
            return Err(OrchestratorError::EmptyMethodList);
        }

        let strategies = methods
            .iter()
            .map(|m| factory.build(m.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(strategies)
    }

    /// Method names in invocation order.
    pub fn methods(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs every strategy on `text` and merges the results.
    #[instrument(skip(self, text), fields(text_len = text.len(), strategies = self.strategies.len()))]
    pub async fn run(&self, text: &str) -> OrchestratorResult<OrchestratorRun> {
        let mut by_method = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let method = strategy.name();
            let output = strategy
                .infer(text)
                .await
                .map_err(|source| OrchestratorError::Strategy { method, source })?;

            debug!(method, codes = output.inferred_codes.len(), "Strategy finished");
            by_method.push(MethodOutput {
                method: method.to_string(),
                output,
            });
        }

        let merged = merge_results(by_method.iter().map(|m| &m.output));
        let methods_run: Vec<String> = by_method.iter().map(|m| m.method.clone()).collect();

        info!(
            methods = ?methods_run,
            merged = merged.len(),
            "Merged strategy outputs"
        );

        let mut params = AuditParameters::new();
        params.insert("methods".into(), json!(methods_run));
        params.insert("strategy_count".into(), json!(self.strategies.len()));

        Ok(OrchestratorRun {
            methods_run,
            by_method,
            output: InferenceResult::new(merged, Audit::now(ORCHESTRATOR_METHOD, params)),
        })
    }
}
