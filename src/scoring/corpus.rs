//! Reference corpus of `(code, description)` pairs.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::error::CorpusError;
use crate::hashing::{hash_bytes, hash_text};

const CODE_COLUMN: &str = "code";
const DESCRIPTION_COLUMN: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One reference code and its description.
pub struct CorpusEntry {
    pub code: String,
    pub description: String,
}

impl CorpusEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
/// Ordered corpus with a checksum of its source.
///
/// The checksum is part of every lexical cache key, so editing the corpus
/// invalidates cached results.
pub struct ReferenceCorpus {
    entries: Vec<CorpusEntry>,
    checksum: String,
    source: Option<PathBuf>,
}

impl ReferenceCorpus {
    /// Builds a corpus from in-memory entries. The checksum covers every record.
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Self {
        let canonical: String = entries
            .iter()
            .map(|e| format!("{}\t{}\n", e.code, e.description))
            .collect();
        Self {
            checksum: hash_text(&canonical),
            entries,
            source: None,
        }
    }

    /// Loads a CSV file with at least `code` and `description` columns.
    ///
    /// Extra columns are ignored and column order is free. The checksum is the
    /// BLAKE3 digest of the raw file bytes.
    pub fn from_csv_path(path: &Path) -> Result<Self, CorpusError> {
        let bytes = std::fs::read(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let csv_err = |source: csv::Error| CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes.as_slice());

        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CorpusError::MissingColumn {
                    column: name,
                    path: path.to_path_buf(),
                })
        };
        let code_idx = column(CODE_COLUMN)?;
        let desc_idx = column(DESCRIPTION_COLUMN)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let code = record.get(code_idx).map(str::trim).unwrap_or_default();
            match record.get(desc_idx) {
                Some(description) if !code.is_empty() => {
                    entries.push(CorpusEntry::new(code, description));
                }
                _ => {
                    warn!(
                        path = %path.display(),
                        line = record.position().map(|p| p.line()),
                        "Skipping corpus row without code or description"
                    );
                }
            }
        }

        info!(
            path = %path.display(),
            entries = entries.len(),
            "Loaded reference corpus"
        );

        Ok(Self {
            entries,
            checksum: hash_bytes(&bytes),
            source: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&CorpusEntry> {
        self.entries.get(idx)
    }

    /// Hex checksum of the corpus source.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Path the corpus was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
