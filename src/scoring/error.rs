use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading the reference corpus.
pub enum CorpusError {
    /// The corpus file could not be read.
    #[error("failed to read reference corpus {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus file is not valid CSV.
    #[error("malformed reference corpus {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("reference corpus {path} is missing required column '{column}'")]
    MissingColumn { column: &'static str, path: PathBuf },
}

#[derive(Debug, Error)]
/// Errors raised by a similarity scorer.
pub enum ScoringError {
    #[error("scorer returned {actual} scores for a corpus of {expected} entries")]
    LengthMismatch { expected: usize, actual: usize },
}
