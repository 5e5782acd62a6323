use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::vectorizer::ngram::{ngrams, NgramOptions, DEFAULT_NGRAM_SIZE};
use crate::vectorizer::token::TokenFrequency;
use crate::vectorizer::Token;

/// 語彙
/// An ordered set of unique tokens. The position of a token is its dimension
/// index in every dense vector built from this vocabulary, so a vocabulary
/// must be kept as is and passed back to vectorize new text comparably.
///
/// # Serialization
/// Supported through serde, and as CBOR bytes with `to_cbor` / `from_cbor`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Token>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            tokens: IndexSet::new(),
        }
    }

    /// Build from tokens in order. Duplicates keep their first position.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// token -> 次元インデックス
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    /// 次元インデックス -> token
    #[inline]
    pub fn token_at(&self, index: usize) -> Option<&str> {
        self.tokens.get_index(index).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// Insert at the end if absent. Returns the token's index.
    pub(crate) fn insert(&mut self, token: &str) -> usize {
        match self.tokens.get_index_of(token) {
            Some(idx) => idx,
            None => self.tokens.insert_full(token.to_string()).0,
        }
    }

    pub fn to_vec(&self) -> Vec<Token> {
        self.tokens.iter().cloned().collect()
    }

    /// CBORにシリアライズ
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// CBORからデシリアライズ
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a Token;
    type IntoIter = indexmap::set::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<T: Into<Token>> FromIterator<T> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

/// 語彙構築のオプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyOptions {
    /// n-gram size (default: 3)
    pub n: usize,
    /// tokens seen fewer times than this over the whole corpus are dropped (default: 1)
    pub min_count: u32,
    pub ngram_opts: NgramOptions,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            n: DEFAULT_NGRAM_SIZE,
            min_count: 1,
            ngram_opts: NgramOptions::default(),
        }
    }
}

/// コーパスから語彙を構築する
///
/// Every document is tokenized with `ngrams(doc, n, ngram_opts)`. Global
/// counts below `min_count` are dropped and the rest is sorted by count,
/// descending. Equal counts keep the order in which tokens first appear in
/// the corpus, so the result is reproducible.
///
/// # Arguments
/// * `corpus` - ドキュメントのスライス
/// * `opts` - 構築オプション
///
/// # Returns
/// * `Vocabulary` - 頻度降順の語彙
pub fn fit_vocabulary<S>(corpus: &[S], opts: &VocabularyOptions) -> Vocabulary
where
    S: AsRef<str>,
{
    let mut freq = TokenFrequency::new();
    for doc in corpus {
        freq.add_tokens(&ngrams(doc.as_ref(), opts.n, &opts.ngram_opts));
    }
    let distinct = freq.token_num();
    let min_count = opts.min_count;
    let dropped = freq.remove_tokens_by_condition(|_, &count| count < min_count);
    let vocab: Vocabulary = freq
        .sorted_frequency_vector()
        .into_iter()
        .map(|(token, _)| token)
        .collect();
    debug!(
        documents = corpus.len(),
        n = opts.n,
        min_count,
        distinct,
        dropped,
        vocabulary = vocab.len(),
        "fitted n-gram vocabulary"
    );
    vocab
}
