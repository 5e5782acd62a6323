pub mod token;
pub mod ngram;
pub mod vocabulary;
pub mod embedding;
pub mod tfidf;
pub mod dense;
pub mod topic;

use indexmap::IndexMap;

/// A character n-gram. Equality is plain string equality.
pub type Token = String;

/// Sparse per-document term weights (TF, IDF, TF-IDF or softmax).
/// Iteration follows insertion order.
pub type TermMap = IndexMap<Token, f64>;
