//! Shared defaults and identifiers.
//!
//! Values here feed into cache keys and audit records, so changing any of
//! them invalidates previously cached lexical results.

/// Cache file format version written by [`crate::cache::CacheStore`].
pub const CACHE_FORMAT_VERSION: &str = "v1";

/// Default number of corpus entries considered per lexical query.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum similarity for a lexical candidate to be kept.
pub const DEFAULT_THRESHOLD: f64 = 0.25;

/// Version tag of the lexical scoring model. Part of every lexical cache key.
pub const LEXICAL_MODEL_VERSION: &str = "v1";

/// Longest corpus description quoted in a lexical justification.
pub const MAX_JUSTIFICATION_DESCRIPTION_CHARS: usize = 200;

/// Endpoint value selecting the in-process mock suggestion backend.
pub const MOCK_ENDPOINT: &str = "mock";

/// Default RAG index identifier recorded in audits.
pub const DEFAULT_RAG_INDEX_VERSION: &str = "mock-index-v1";

/// Default timeout for remote suggestion requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Method name of the merged result.
pub const ORCHESTRATOR_METHOD: &str = "orchestrator";

/// Method name of the cached TF-IDF strategy.
pub const METHOD_LEXICAL: &str = "lexical";
/// Method name of the pattern-matching strategy.
pub const METHOD_REGEX: &str = "regex";
/// Method name of the LLM suggestion strategy.
pub const METHOD_LLM: &str = "llm";
/// Method name of the retrieval-augmented suggestion strategy.
pub const METHOD_RAG: &str = "rag";

/// Every method name the factory can resolve, in documentation order.
pub const ALLOWED_METHODS: [&str; 4] = [METHOD_LEXICAL, METHOD_REGEX, METHOD_LLM, METHOD_RAG];
