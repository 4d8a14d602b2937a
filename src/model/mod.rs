//! Result data model shared by every strategy and the orchestrator.

mod types;

#[cfg(test)]
mod tests;

pub use types::{
    Audit, AuditParameters, CodeSystem, InferenceResult, InferredCode, Justification, now_iso,
};
