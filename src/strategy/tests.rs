use super::*;
use crate::cache::{JsonFileCache, MemoryResultCache, ResultCache};
use crate::config::Config;
use crate::model::CodeSystem;
use crate::scoring::{CorpusEntry, ReferenceCorpus, ScoringError, SimilarityScorer};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

/// Returns the same scores for every query.
struct FixedScorer(Vec<f32>);

impl SimilarityScorer for FixedScorer {
    fn score(&self, _normalized_query: &str) -> Result<Vec<f32>, ScoringError> {
        Ok(self.0.clone())
    }

    fn parameters(&self) -> serde_json::Value {
        json!({"kind": "fixed"})
    }
}

fn ambulance_corpus() -> ReferenceCorpus {
    ReferenceCorpus::from_entries(vec![
        CorpusEntry::new(
            "A0428",
            "Ambulance service, basic life support, non-emergency transport",
        ),
        CorpusEntry::new("G0008", "Administration of influenza virus vaccine"),
        CorpusEntry::new("E0110", "Crutches, forearm, includes crutches of various materials"),
        CorpusEntry::new("J0120", "Injection, tetracycline, up to 250 mg"),
    ])
}

fn numbered_corpus(n: usize) -> ReferenceCorpus {
    ReferenceCorpus::from_entries(
        (0..n)
            .map(|i| CorpusEntry::new(format!("C{i:04}"), format!("entry number {i}")))
            .collect(),
    )
}

fn fixed(scores: Vec<f32>, top_k: usize, threshold: f64) -> LexicalInference {
    LexicalInference::with_scorer(
        numbered_corpus(scores.len()),
        Arc::new(FixedScorer(scores)),
        Arc::new(MemoryResultCache::new()),
        top_k,
        threshold,
    )
}

fn codes(result: &crate::model::InferenceResult) -> Vec<&str> {
    result.inferred_codes.iter().map(|c| c.code.as_str()).collect()
}

#[test]
fn test_lexical_miss_then_hit() {
    let cache = Arc::new(MemoryResultCache::new());
    let lexical = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);
    let text = "Non-emergency ambulance transport with basic life support";

    let first = lexical.infer_cached(text).expect("first run");
    assert_eq!(first.cache_hit(), Some(false));
    assert_eq!(codes(&first), vec!["A0428"]);
    assert_eq!(cache.write_count(), 1);

    let second = lexical.infer_cached(text).expect("second run");
    assert_eq!(second.cache_hit(), Some(true));
    assert_eq!(second.inferred_codes, first.inferred_codes);
    assert_eq!(cache.write_count(), 1);

    let key = lexical.cache_key(text);
    assert_eq!(first.audit.parameter("cached_result_key"), Some(&json!(key)));
    assert_eq!(second.audit.parameter("cached_result_key"), Some(&json!(key)));
    assert_eq!(second.audit.parameter("cache_path"), Some(&json!("memory")));
}

#[test]
fn test_stored_entry_carries_no_cache_flags() {
    let cache = Arc::new(MemoryResultCache::new());
    let lexical = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);
    let text = "influenza vaccine administration";

    lexical.infer_cached(text).expect("run");
    let stored = cache.get(&lexical.cache_key(text)).expect("stored");
    assert_eq!(stored.cache_hit(), None);
    assert!(stored.audit.parameter("cache_path").is_none());
}

#[test]
fn test_lexical_audit_parameters() {
    let lexical = LexicalInference::new(
        ambulance_corpus(),
        Arc::new(MemoryResultCache::new()),
        3,
        0.5,
    );

    let result = lexical.infer_cached("crutches").expect("run");
    let audit = &result.audit;
    assert_eq!(audit.method, "lexical");
    assert_eq!(audit.parameter("method_version"), Some(&json!("v1")));
    assert_eq!(audit.parameter("top_k"), Some(&json!(3)));
    assert_eq!(audit.parameter("threshold"), Some(&json!(0.5)));
    assert_eq!(
        audit.parameter("corpus_checksum"),
        Some(&json!(lexical.corpus().checksum()))
    );
    assert_eq!(
        audit.parameter("vectorizer"),
        Some(&json!({"ngram_range": [1, 2], "stop_words": "english"}))
    );
}

#[test]
fn test_lexical_justification_format() {
    let result = fixed(vec![0.5], 1, 0.0).compute("anything").expect("run");
    let code = &result.inferred_codes[0];

    assert_eq!(code.code_system, CodeSystem::Hcpcs);
    assert_eq!(
        code.justification.reason,
        "Lexical similarity between policy text and HCPCS description."
    );
    assert_eq!(
        code.justification.details.as_deref(),
        Some("score=0.5000; matched_description=entry number 0")
    );
}

#[test]
fn test_threshold_is_inclusive() {
    let result = fixed(vec![0.9, 0.25, 0.3, 0.1], 5, 0.25)
        .compute("query")
        .expect("run");
    assert_eq!(codes(&result), vec!["C0000", "C0002", "C0001"]);
}

#[test]
fn test_top_k_applies_before_threshold() {
    let result = fixed(vec![0.9, 0.25, 0.3, 0.1], 2, 0.25)
        .compute("query")
        .expect("run");
    assert_eq!(codes(&result), vec!["C0000", "C0002"]);

    let result = fixed(vec![0.1, 0.9], 1, 0.5).compute("query").expect("run");
    assert_eq!(codes(&result), vec!["C0001"]);
}

#[test]
fn test_ties_keep_corpus_order() {
    let result = fixed(vec![0.5, 0.5, 0.5], 2, 0.0)
        .compute("query")
        .expect("run");
    assert_eq!(codes(&result), vec!["C0000", "C0001"]);
}

#[test]
fn test_nothing_above_threshold_is_empty() {
    let result = fixed(vec![0.1, 0.2], 5, 0.25).compute("query").expect("run");
    assert!(result.is_empty());
}

#[test]
fn test_empty_query_skips_scoring() {
    // Scorer length disagrees with the corpus; it must not be consulted.
    let lexical = LexicalInference::with_scorer(
        numbered_corpus(2),
        Arc::new(FixedScorer(vec![1.0])),
        Arc::new(MemoryResultCache::new()),
        5,
        0.0,
    );

    let result = lexical.compute("   \n\t ").expect("empty query");
    assert!(result.is_empty());
}

#[test]
fn test_score_length_mismatch_is_error() {
    let lexical = LexicalInference::with_scorer(
        numbered_corpus(2),
        Arc::new(FixedScorer(vec![1.0])),
        Arc::new(MemoryResultCache::new()),
        5,
        0.0,
    );

    let err = lexical.compute("query").expect_err("should fail");
    assert!(matches!(
        err,
        StrategyError::Scoring(ScoringError::LengthMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_cache_write_failure_propagates() {
    let cache = Arc::new(MemoryResultCache::new());
    cache.fail_writes(true);
    let lexical = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);

    let err = lexical.infer_cached("ambulance").expect_err("should fail");
    assert!(matches!(err, StrategyError::Cache(_)));
    assert!(cache.is_empty());
}

#[test]
fn test_unwritable_file_cache_never_reports_hit() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a directory").expect("write blocker");

    let cache_path = blocker.join("cache.json");
    let cache = Arc::new(JsonFileCache::new(&cache_path));
    let lexical = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);

    for _ in 0..2 {
        let err = lexical
            .infer_cached("ambulance transport")
            .expect_err("write should fail every time");
        assert!(matches!(err, StrategyError::Cache(_)));
    }

    assert!(cache.get(&lexical.cache_key("ambulance transport")).is_none());
    assert!(!cache_path.exists());
}

#[test]
fn test_cache_key_tracks_parameters() {
    let cache: Arc<dyn ResultCache> = Arc::new(MemoryResultCache::new());
    let base = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);
    let text = "ambulance transport";

    let other_top_k = LexicalInference::new(ambulance_corpus(), cache.clone(), 4, 0.25);
    let other_threshold = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.3);

    let mut entries = ambulance_corpus().entries().to_vec();
    entries[1].description.push_str(" (updated)");
    let other_corpus =
        LexicalInference::new(ReferenceCorpus::from_entries(entries), cache.clone(), 5, 0.25);

    let key = base.cache_key(text);
    assert_eq!(key, base.cache_key(text));
    assert_ne!(key, base.cache_key("ambulance transport "));
    assert_ne!(key, other_top_k.cache_key(text));
    assert_ne!(key, other_threshold.cache_key(text));
    assert_ne!(key, other_corpus.cache_key(text));
}

#[test]
fn test_corrupted_cache_file_recovers_on_miss() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cached_results.json");
    std::fs::write(&path, "{ not json").expect("write corrupt file");

    let cache = Arc::new(JsonFileCache::new(&path));
    let lexical = LexicalInference::new(ambulance_corpus(), cache.clone(), 5, 0.25);

    let result = lexical.infer_cached("ambulance transport").expect("run");
    assert_eq!(result.cache_hit(), Some(false));
    assert_eq!(
        result.audit.parameter("cache_path"),
        Some(&json!(path.display().to_string()))
    );

    let persisted: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("valid json");
    assert_eq!(persisted["version"], json!("v1"));
    assert_eq!(persisted["entries"].as_object().map(|e| e.len()), Some(1));
}

#[test]
fn test_file_cache_survives_new_instance() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("cache.json");
    let text = "influenza virus vaccine";

    let first = LexicalInference::new(
        ambulance_corpus(),
        Arc::new(JsonFileCache::new(&path)),
        5,
        0.25,
    )
    .infer_cached(text)
    .expect("first run");

    let second = LexicalInference::new(
        ambulance_corpus(),
        Arc::new(JsonFileCache::new(&path)),
        5,
        0.25,
    )
    .infer_cached(text)
    .expect("second run");

    assert_eq!(first.cache_hit(), Some(false));
    assert_eq!(second.cache_hit(), Some(true));
    assert_eq!(second.inferred_codes, first.inferred_codes);
}

#[tokio::test]
async fn test_llm_mock_output() {
    let llm = LlmInference::new(MockSuggestionClient::llm());
    let result = llm.infer_remote("any text").await.expect("mock answers");

    assert_eq!(codes(&result), vec!["A0428"]);
    assert_eq!(result.inferred_codes[0].confidence, 0.7);
    assert_eq!(result.audit.method, "llm");
    assert_eq!(result.audit.parameter("model"), Some(&json!("mock-llm-v1")));
    assert_eq!(result.audit.parameter("mode"), Some(&json!("mock")));
    assert_eq!(result.audit.parameter("endpoint"), Some(&json!("mock")));
}

#[tokio::test]
async fn test_llm_unknown_model_and_remote_timestamp() {
    let llm = LlmInference::new(MockSuggestionClient::with_response(SuggestionResponse {
        codes: vec![],
        model: None,
        timestamp: Some("2024-05-01T12:00:00+00:00".to_string()),
    }));

    let result = llm.infer_remote("text").await.expect("mock answers");
    assert!(result.is_empty());
    assert_eq!(result.audit.parameter("model"), Some(&json!("unknown")));
    assert_eq!(result.audit.timestamp, "2024-05-01T12:00:00+00:00");
}

#[tokio::test]
async fn test_rag_mock_output() {
    let rag = RagInference::new(MockSuggestionClient::rag(), 5, "mock-index-v1");
    let result = rag.infer_remote("any text").await.expect("mock answers");

    assert_eq!(codes(&result), vec!["A1234", "B5678"]);
    assert_eq!(result.inferred_codes[0].confidence, 0.85);
    assert_eq!(
        result.inferred_codes[1].justification.details.as_deref(),
        Some("Mock RAG: similarity score above threshold.")
    );
    assert_eq!(result.audit.method, "rag");
    assert_eq!(result.audit.parameter("top_k"), Some(&json!(5)));
    assert_eq!(
        result.audit.parameter("index_version"),
        Some(&json!("mock-index-v1"))
    );
}

#[tokio::test]
async fn test_rag_truncates_to_top_k() {
    let rag = RagInference::new(MockSuggestionClient::rag(), 1, "idx");
    let result = rag.infer_remote("text").await.expect("mock answers");
    assert_eq!(codes(&result), vec!["A1234"]);
}

#[tokio::test]
async fn test_remote_failure_is_strategy_error() {
    let llm = LlmInference::new(MockSuggestionClient::failing("connection refused"));
    let err = llm.infer_remote("text").await.expect_err("should fail");

    assert!(matches!(err, StrategyError::Remote(RemoteError::Unavailable { .. })));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_malformed_remote_confidence_is_rejected() {
    let rag = RagInference::new(
        MockSuggestionClient::with_response(SuggestionResponse {
            codes: vec![RawCandidate::new("A1234", -0.2, RawJustification::default())],
            ..Default::default()
        }),
        5,
        "idx",
    );

    let err = rag.infer_remote("text").await.expect_err("should fail");
    assert!(matches!(err, StrategyError::Remote(RemoteError::Malformed { .. })));
}

fn test_factory() -> StrategyFactory {
    StrategyFactory::from_config(&Config::default())
        .with_corpus(ambulance_corpus())
        .with_cache(Arc::new(MemoryResultCache::new()))
}

#[test]
fn test_factory_unknown_method() {
    let err = test_factory().build("foo").expect_err("should reject");

    assert!(matches!(err, StrategyBuildError::UnknownMethod { .. }));
    let message = err.to_string();
    assert!(message.contains("'foo'"));
    assert!(message.contains("lexical, regex, llm, rag"));
}

#[test]
fn test_factory_builds_every_method() {
    let factory = test_factory();
    for method in crate::constants::ALLOWED_METHODS {
        let strategy = factory.build(method).expect("should build");
        assert_eq!(strategy.name(), method);
    }
}

#[test]
fn test_factory_missing_corpus_file() {
    let dir = tempdir().expect("tempdir");
    let config = Config {
        corpus_path: dir.path().join("missing.csv"),
        ..Default::default()
    };

    let err = StrategyFactory::from_config(&config)
        .build("lexical")
        .expect_err("should fail");
    assert!(matches!(err, StrategyBuildError::Corpus(_)));
    assert!(err.to_string().contains("missing.csv"));
}

#[tokio::test]
async fn test_strategy_enum_dispatch() {
    let factory = test_factory();

    let regex = factory.build("regex").expect("regex");
    let result = regex.infer("see CPT 99213").await.expect("regex runs");
    assert_eq!(codes(&result), vec!["99213"]);

    let lexical = factory.build("lexical").expect("lexical");
    let result = lexical.infer("influenza vaccine").await.expect("lexical runs");
    assert_eq!(result.audit.method, "lexical");
    assert_eq!(result.cache_hit(), Some(false));
}

#[tokio::test]
async fn test_factory_strategies_share_cache() {
    let cache = Arc::new(MemoryResultCache::new());
    let factory = StrategyFactory::from_config(&Config::default())
        .with_corpus(ambulance_corpus())
        .with_cache(cache.clone());

    let first = factory.build("lexical").expect("lexical");
    let second = factory.build("lexical").expect("lexical");

    first.infer("ambulance").await.expect("first");
    let result = second.infer("ambulance").await.expect("second");

    assert_eq!(result.cache_hit(), Some(true));
    assert_eq!(cache.write_count(), 1);
}
