use serde::{Deserialize, Serialize};

use crate::model::InferenceResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One strategy's untouched output inside a run trace.
pub struct MethodOutput {
    pub method: String,
    pub output: InferenceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full trace of one orchestrator run: every strategy output plus the merge.
pub struct OrchestratorRun {
    /// Method names in invocation order (duplicates preserved).
    pub methods_run: Vec<String>,
    pub by_method: Vec<MethodOutput>,
    /// Merged result, `method = "orchestrator"`.
    pub output: InferenceResult,
}

impl OrchestratorRun {
    /// Output of the first strategy named `method`, if it ran.
    pub fn output_of(&self, method: &str) -> Option<&InferenceResult> {
        self.by_method
            .iter()
            .find(|m| m.method == method)
            .map(|m| &m.output)
    }
}
