use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::math::vector::l2_normalize;
use crate::vectorizer::ngram::{ngrams, NgramOptions, DEFAULT_NGRAM_SIZE};
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};
use crate::vectorizer::vocabulary::{fit_vocabulary, Vocabulary, VocabularyOptions};

/// 埋め込みの重み付け方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// raw token counts
    #[default]
    Tf,
    /// counts times smoothed IDF over the embedded corpus
    TfIdf,
}

/// n-gram + TF 埋め込みのオプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingOptions {
    /// n-gram size (default: 3)
    pub n: usize,
    /// minimum corpus count for a token to enter a fitted vocabulary (default: 1)
    pub min_count: u32,
    pub ngram_opts: NgramOptions,
    pub weighting: Weighting,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self {
            n: DEFAULT_NGRAM_SIZE,
            min_count: 1,
            ngram_opts: NgramOptions::default(),
            weighting: Weighting::Tf,
        }
    }
}

impl EmbeddingOptions {
    pub fn with_n(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    fn vocabulary_options(&self) -> VocabularyOptions {
        VocabularyOptions {
            n: self.n,
            min_count: self.min_count,
            ngram_opts: self.ngram_opts.clone(),
        }
    }
}

/// Raw counts of the text's n-grams found in `vocab`, one slot per vocabulary token.
fn count_vector(text: &str, vocab: &Vocabulary, n: usize, ngram_opts: &NgramOptions) -> Vec<f64> {
    let mut vec = vec![0.0; vocab.len()];
    for token in ngrams(text, n, ngram_opts) {
        // 語彙に無いtokenは無視
        if let Some(idx) = vocab.index_of(&token) {
            vec[idx] += 1.0;
        }
    }
    vec
}

/// テキストをTFベクトルに変換する
///
/// Counts every n-gram of `text` present in `vocab`, then L2-normalizes.
/// Tokens outside the vocabulary are ignored. When nothing overlaps (empty
/// text, empty vocabulary) the all-zero vector is returned as is.
///
/// # Arguments
/// * `text` - 入力テキスト
/// * `vocab` - 語彙 (次元の順序を決める)
/// * `n` - n-gramのサイズ
/// * `ngram_opts` - n-gram生成オプション
///
/// # Returns
/// * `Vec<f64>` - 長さ `vocab.len()` のベクトル
pub fn text_to_tf_vector(
    text: &str,
    vocab: &Vocabulary,
    n: usize,
    ngram_opts: &NgramOptions,
) -> Vec<f64> {
    let mut vec = count_vector(text, vocab, n, ngram_opts);
    l2_normalize(&mut vec);
    vec
}

/// Embed one text with `opts.n` and `opts.ngram_opts`.
///
/// Always term-frequency based: a single text is a one-document corpus where
/// the smoothed IDF of every present token is exactly 1, so `Weighting::TfIdf`
/// gives the same vector.
pub fn embed_text(text: &str, vocab: &Vocabulary, opts: &EmbeddingOptions) -> Vec<f64> {
    text_to_tf_vector(text, vocab, opts.n, &opts.ngram_opts)
}

/// コーパス全体を埋め込む (順序を保持)
///
/// With `Weighting::Tf` every vector equals `embed_text` of the same document.
/// With `Weighting::TfIdf` counts are multiplied by the smoothed IDF computed
/// over `corpus` itself before L2 normalization.
pub fn embed_corpus<S>(corpus: &[S], vocab: &Vocabulary, opts: &EmbeddingOptions) -> Vec<Vec<f64>>
where
    S: AsRef<str> + Sync,
{
    match opts.weighting {
        Weighting::Tf => corpus
            .par_iter()
            .map(|doc| embed_text(doc.as_ref(), vocab, opts))
            .collect(),
        Weighting::TfIdf => {
            let counts: Vec<Vec<f64>> = corpus
                .par_iter()
                .map(|doc| count_vector(doc.as_ref(), vocab, opts.n, &opts.ngram_opts))
                .collect();
            let doc_num = counts.len() as u64;
            let idf: Vec<f64> = (0..vocab.len())
                .map(|dim| {
                    let doc_freq = counts.iter().filter(|c| c[dim] > 0.0).count() as u64;
                    DefaultTFIDFEngine::idf_calc(doc_num, doc_freq)
                })
                .collect();
            counts
                .into_iter()
                .map(|mut vec| {
                    vec.iter_mut().zip(&idf).for_each(|(v, w)| *v *= w);
                    l2_normalize(&mut vec);
                    vec
                })
                .collect()
        }
    }
}

/// Fit a vocabulary with the same n-gram settings the embeddings will use.
pub fn fit_embedding_vocabulary<S>(corpus: &[S], opts: &EmbeddingOptions) -> Vocabulary
where
    S: AsRef<str>,
{
    fit_vocabulary(corpus, &opts.vocabulary_options())
}
