use thiserror::Error;

/// Errors raised by the topic queries, the factorizer and vocabulary persistence.
///
/// Degenerate input (empty corpus, empty vocabulary, empty document) is not an
/// error anywhere in this crate: those cases produce empty or zero results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("document index {index} out of range (documents: {len})")]
    DocumentOutOfRange { index: usize, len: usize },
    #[error("topic index {index} out of range (topics: {len})")]
    TopicOutOfRange { index: usize, len: usize },
    #[error("no dominant entry in a {rows}x{cols} matrix")]
    EmptyMatrix { rows: usize, cols: usize },
    #[error("number of topics must be at least 1")]
    InvalidTopicCount,
    #[error("factorization input has a negative entry at ({row}, {col})")]
    NegativeEntry { row: usize, col: usize },
    #[error("factor {name} is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    FactorShape {
        name: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("vocabulary codec error: {0}")]
    Codec(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
