//! TF-IDF vector-space index over corpus descriptions.

use std::collections::HashMap;

use serde_json::{Value, json};

use super::SimilarityScorer;
use super::error::ScoringError;
use super::text::{ngrams, normalize_text, tokenize};

type SparseVector = Vec<(usize, f32)>;

/// Term-weighting model fit once over a document set.
///
/// Terms are 1- and 2-grams of non-stop-word tokens. Weights are raw counts
/// times smoothed IDF `ln((1 + n) / (1 + df)) + 1`, L2-normalized per
/// document, so the dot product of two vectors is their cosine similarity.
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    documents: Vec<SparseVector>,
}

impl TfidfIndex {
    /// Fits the model and vectorizes every document.
    pub fn fit<'a>(documents: impl IntoIterator<Item = &'a str>) -> Self {
        let counted: Vec<HashMap<String, usize>> = documents
            .into_iter()
            .map(|doc| term_counts(&normalize_text(doc)))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &counted {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_default() += 1;
            }
        }

        let mut terms: Vec<&str> = document_frequency.keys().copied().collect();
        terms.sort_unstable();

        let n = counted.len() as f32;
        let idf: Vec<f32> = terms
            .iter()
            .map(|t| {
                let df = document_frequency[t] as f32;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            documents: Vec::new(),
        };
        let documents = counted.iter().map(|c| index.weigh(c)).collect();
        index.documents = documents;
        index
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    fn weigh(&self, counts: &HashMap<String, usize>) -> SparseVector {
        let mut vector: SparseVector = counts
            .iter()
            .filter_map(|(term, &count)| {
                self.vocabulary
                    .get(term)
                    .map(|&idx| (idx, count as f32 * self.idf[idx]))
            })
            .collect();
        vector.sort_unstable_by_key(|&(idx, _)| idx);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

fn term_counts(normalized: &str) -> HashMap<String, usize> {
    let tokens = tokenize(normalized);
    let mut counts = HashMap::new();
    for term in ngrams(&tokens) {
        *counts.entry(term).or_default() += 1;
    }
    counts
}

impl SimilarityScorer for TfidfIndex {
    fn score(&self, normalized_query: &str) -> Result<Vec<f32>, ScoringError> {
        if normalized_query.is_empty() {
            return Ok(vec![0.0; self.documents.len()]);
        }

        let query: HashMap<usize, f32> = self
            .weigh(&term_counts(normalized_query))
            .into_iter()
            .collect();

        Ok(self
            .documents
            .iter()
            .map(|doc| {
                doc.iter()
                    .filter_map(|(idx, w)| query.get(idx).map(|q| q * w))
                    .sum::<f32>()
                    .clamp(0.0, 1.0)
            })
            .collect())
    }

    fn parameters(&self) -> Value {
        json!({"ngram_range": [1, 2], "stop_words": "english"})
    }
}
