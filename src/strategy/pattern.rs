//! Explicit code mentions found by pattern matching.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::constants::METHOD_REGEX;
use crate::model::{Audit, AuditParameters, CodeSystem, InferenceResult, InferredCode, Justification};

/// HCPCS Level II: one letter A–V followed by four digits (`G0008`, `A0428`).
static HCPCS_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([A-V][0-9]{4})\b").expect("HCPCS pattern is valid"));

/// CPT only when introduced by the keyword: `CPT 99213`, `CPT® 99213`.
static CPT_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCPT(?:®)?\s*([0-9]{5})\b").expect("CPT pattern is valid")
});

/// ICD-10 only when introduced by the keyword: `ICD-10 Z00.00`, `ICD10-CM E11.9`.
static ICD10_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bICD-?10(?:-CM)?\s*([A-TV-Z][0-9][0-9A-Z](?:\.[0-9A-Z]{1,4})?)\b")
        .expect("ICD-10 pattern is valid")
});

const PATTERN_NAMES: [&str; 3] = ["HCPCS_ALPHA", "CPT_CONTEXT", "ICD10_CONTEXT"];

/// Pattern-matching strategy. Stateless and uncached.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternInference;

impl PatternInference {
    pub fn new() -> Self {
        Self
    }

    /// Emits every distinct HCPCS, then CPT, then ICD-10 mention, each group
    /// sorted, all with confidence `1.0`.
    pub fn infer_text(&self, text: &str) -> InferenceResult {
        let mut found = Vec::new();

        for code in distinct_matches(&HCPCS_ALPHA, text) {
            let reason = format!("Explicitly mentioned in policy text: {code}");
            found.push(mention(code, CodeSystem::Hcpcs, reason));
        }
        for code in distinct_matches(&CPT_CONTEXT, text) {
            let reason = format!("Explicitly mentioned in policy text: CPT {code}");
            found.push(mention(code, CodeSystem::Cpt, reason));
        }
        for code in distinct_matches(&ICD10_CONTEXT, text) {
            let reason = format!("Explicitly mentioned in policy text: ICD-10 {code}");
            found.push(mention(code, CodeSystem::Icd10, reason));
        }

        let mut params = AuditParameters::new();
        params.insert("patterns".into(), json!(PATTERN_NAMES));
        InferenceResult::new(found, Audit::now(METHOD_REGEX, params))
    }
}

fn mention(code: String, code_system: CodeSystem, reason: String) -> InferredCode {
    InferredCode::new(code, code_system, 1.0, Justification::new(reason))
}

/// Uppercased first-group matches, deduplicated and sorted.
fn distinct_matches(pattern: &Regex, text: &str) -> BTreeSet<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
        .collect()
}
