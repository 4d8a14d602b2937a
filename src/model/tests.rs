use super::*;
use serde_json::json;

#[test]
fn test_code_system_wire_names() {
    assert_eq!(CodeSystem::Hcpcs.as_str(), "HCPCS");
    assert_eq!(CodeSystem::Cpt.as_str(), "CPT");
    assert_eq!(CodeSystem::Icd10.as_str(), "ICD10");
    assert_eq!(format!("{}", CodeSystem::Icd10), "ICD10");
}

#[test]
fn test_code_system_default_is_hcpcs() {
    assert_eq!(CodeSystem::default(), CodeSystem::Hcpcs);
}

#[test]
fn test_inferred_code_missing_code_system_defaults() {
    let code: InferredCode = serde_json::from_value(json!({
        "code": "A0428",
        "confidence": 0.7,
        "justification": {"reason": "ambulance"}
    }))
    .expect("should deserialize");

    assert_eq!(code.code_system, CodeSystem::Hcpcs);
    assert_eq!(code.justification.details, None);
}

#[test]
fn test_inferred_code_serializes_code_system_name() {
    let code = InferredCode::new("99213", CodeSystem::Cpt, 1.0, Justification::new("seen"));
    let value = serde_json::to_value(&code).expect("should serialize");
    assert_eq!(value["code_system"], "CPT");
}

#[test]
fn test_merge_key() {
    let code = InferredCode::new("Z00.00", CodeSystem::Icd10, 1.0, Justification::new("seen"));
    assert_eq!(code.merge_key(), ("ICD10", "Z00.00"));
}

#[test]
fn test_audit_parameters_roundtrip_through_json() {
    let mut audit = Audit::now("lexical", AuditParameters::new());
    audit.set_parameter("top_k", 5);
    audit.set_parameter("vectorizer", json!({"ngram_range": [1, 2]}));

    let result = InferenceResult::new(vec![], audit);
    let text = serde_json::to_string(&result).expect("should serialize");
    let decoded: InferenceResult = serde_json::from_str(&text).expect("should deserialize");

    assert_eq!(decoded, result);
    assert_eq!(decoded.audit.parameter("top_k"), Some(&json!(5)));
}

#[test]
fn test_cache_hit_flag() {
    let mut result = InferenceResult::new(vec![], Audit::now("lexical", AuditParameters::new()));
    assert_eq!(result.cache_hit(), None);

    result.audit.set_parameter("cache_hit", true);
    assert_eq!(result.cache_hit(), Some(true));
}

#[test]
fn test_now_iso_is_utc() {
    let ts = now_iso();
    let parsed = chrono::DateTime::parse_from_rfc3339(&ts).expect("should be RFC 3339");
    assert_eq!(parsed.offset().local_minus_utc(), 0);
}
