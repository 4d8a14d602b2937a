use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form audit parameters. Keys serialize in sorted order.
pub type AuditParameters = serde_json::Map<String, Value>;

/// Returns the current UTC time as an RFC 3339 / ISO-8601 string.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
/// Coding vocabulary a code belongs to.
pub enum CodeSystem {
    /// HCPCS Level II (the default vocabulary).
    #[default]
    #[serde(rename = "HCPCS")]
    Hcpcs,
    /// CPT procedure codes.
    #[serde(rename = "CPT")]
    Cpt,
    /// ICD-10 diagnosis codes.
    #[serde(rename = "ICD10")]
    Icd10,
}

impl CodeSystem {
    /// Returns the wire name (`"HCPCS"`, `"CPT"`, `"ICD10"`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSystem::Hcpcs => "HCPCS",
            CodeSystem::Cpt => "CPT",
            CodeSystem::Icd10 => "ICD10",
        }
    }
}

impl std::fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Human-readable explanation attached to an inferred code.
pub struct Justification {
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl Justification {
    /// Creates a justification with a reason only.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: None,
        }
    }

    /// Creates a justification with a reason and details.
    pub fn with_details(reason: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One candidate code proposed by a strategy.
pub struct InferredCode {
    pub code: String,
    #[serde(default)]
    pub code_system: CodeSystem,
    /// In `[0, 1]`.
    pub confidence: f32,
    pub justification: Justification,
}

impl InferredCode {
    pub fn new(
        code: impl Into<String>,
        code_system: CodeSystem,
        confidence: f32,
        justification: Justification,
    ) -> Self {
        Self {
            code: code.into(),
            code_system,
            confidence,
            justification,
        }
    }

    /// Identity used when merging: `(code_system, code)`.
    #[inline]
    pub fn merge_key(&self) -> (&'static str, &str) {
        (self.code_system.as_str(), self.code.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Provenance record for one strategy invocation (or one merge).
pub struct Audit {
    pub timestamp: String,
    pub method: String,
    #[serde(default)]
    pub parameters: AuditParameters,
}

impl Audit {
    /// Creates an audit stamped with the current time.
    pub fn now(method: impl Into<String>, parameters: AuditParameters) -> Self {
        Self {
            timestamp: now_iso(),
            method: method.into(),
            parameters,
        }
    }

    /// Sets (or replaces) a single parameter.
    pub fn set_parameter(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.parameters.insert(key.to_string(), value.into());
    }

    /// Returns a parameter by key.
    pub fn parameter(&self, key: &str) -> Option<&serde_json::Value> {
        self.parameters.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Codes produced by one strategy call (or the merged answer), with provenance.
pub struct InferenceResult {
    #[serde(default)]
    pub inferred_codes: Vec<InferredCode>,
    pub audit: Audit,
}

impl InferenceResult {
    pub fn new(inferred_codes: Vec<InferredCode>, audit: Audit) -> Self {
        Self {
            inferred_codes,
            audit,
        }
    }

    /// Returns `true` if no codes were inferred.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inferred_codes.is_empty()
    }

    /// Returns the `cache_hit` audit flag, if the producing strategy set one.
    pub fn cache_hit(&self) -> Option<bool> {
        self.audit.parameter("cache_hit").and_then(|v| v.as_bool())
    }
}
