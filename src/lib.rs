/// This crate turns short texts into character n-gram vectors and extracts
/// topics from a corpus with TF-IDF weighting and NMF.
pub mod error;
pub mod utils;
pub mod vectorizer;

/// Error type
/// Every fallible operation of this crate returns `Result<T, Error>`.
/// Variants carry the offending index or shape:
/// - `DocumentOutOfRange` / `TopicOutOfRange`: query index outside the matrix
/// - `InvalidTopicCount`: zero topics requested on a non-empty corpus
/// - `EmptyMatrix`: dominant entry asked along an axis of length 0
/// - `NegativeEntry` / `FactorShape`: factorizer input or output rejected
/// - `Codec`: vocabulary (de)serialization failure
pub use error::{Error, Result};

/// String normalization
/// Diacritic removal, lower casing, punctuation removal and whitespace
/// collapsing, each stage toggled by `NormalizeOptions`.
pub use utils::normalizer::{normalize, NormalizeOptions};

/// Edit distance
/// Character level Levenshtein distance and its `[0, 1]` similarity.
pub use utils::distance::{levenshtein, levenshtein_similarity};

/// Vector math
/// Dot product, L2 norm and cosine similarity over plain slices.
pub use utils::math::vector::{cosine, dot, l2_norm, l2_normalize};

/// Dense row-major matrix
/// Used for the document x vocabulary input of the factorizer and for both
/// factors (`W`: documents x topics, `H`: topics x vocabulary).
pub use utils::math::matrix::DenseMatrix;

/// Character n-grams
/// `ngrams` produces the sliding window tokens of one size,
/// `all_ngrams` concatenates a range of sizes.
pub use vectorizer::ngram::{all_ngrams, ngrams, AllNgramsOptions, NgramOptions};

/// Token Frequency structure
/// Occurrence counts of tokens within one document (or a whole corpus when
/// fitting a vocabulary), with the total token count.
pub use vectorizer::token::TokenFrequency;

/// Vocabulary
/// Ordered token set that fixes the dimension order of every embedding.
/// Serializable with CBOR so a fitted vocabulary can be reused.
pub use vectorizer::vocabulary::{fit_vocabulary, Vocabulary, VocabularyOptions};

/// n-gram TF embeddings
/// L2-normalized count vectors over a vocabulary, optionally IDF weighted
/// over the embedded corpus.
pub use vectorizer::embedding::{
    embed_corpus, embed_text, fit_embedding_vocabulary, text_to_tf_vector, EmbeddingOptions,
    Weighting,
};

/// TF IDF Calculation Engine Trait
/// Defines the TF and IDF formulas. `DefaultTFIDFEngine` uses
/// `count / total` and the smoothed `ln((N + 1) / (df + 1)) + 1`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Topic extraction
/// `reduce_dimensionality` runs the full pipeline and returns a `TopicModel`;
/// the free functions query a document-topic matrix directly.
pub use vectorizer::topic::{
    documents_for_dominant_topic, dominant_document_for_topic, dominant_topic_for_document,
    group_by_dominant_topic, reduce_dimensionality, reduce_dimensionality_with, TopicGroup,
    TopicModel,
};

/// Non-negative matrix factorization
/// `Factorizer` is the pluggable interface; `MultiplicativeNmf` is the
/// seeded Lee & Seung implementation used by default.
pub use vectorizer::topic::nmf::{Factorizer, MultiplicativeNmf, NmfConfig};
