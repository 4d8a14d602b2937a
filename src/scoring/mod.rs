//! Lexical similarity scoring against the reference corpus.
//!
//! - [`text`] normalizes and tokenizes input.
//! - [`corpus`] loads the `(code, description)` table and its checksum.
//! - [`tfidf`] provides the default [`SimilarityScorer`].

pub mod corpus;
pub mod error;
pub mod text;
pub mod tfidf;

pub use corpus::{CorpusEntry, ReferenceCorpus};
pub use error::{CorpusError, ScoringError};
pub use text::normalize_text;
pub use tfidf::TfidfIndex;

/// Scores a normalized query against every indexed corpus entry.
pub trait SimilarityScorer: Send + Sync {
    /// Returns one score in `[0, 1]` per corpus entry, in corpus order.
    fn score(&self, normalized_query: &str) -> Result<Vec<f32>, ScoringError>;

    /// Model configuration recorded in audits.
    fn parameters(&self) -> serde_json::Value;
}
