use rayon::prelude::*;

use crate::vectorizer::ngram::{all_ngrams, AllNgramsOptions};
use crate::vectorizer::token::TokenFrequency;
use crate::vectorizer::vocabulary::Vocabulary;
use crate::vectorizer::{TermMap, Token};

/// TF-IDF計算エンジン
///
/// Implementors choose the TF and IDF formulas; the corpus-level operations
/// are provided on top of them.
pub trait TFIDFEngine {
    /// TFの計算
    ///
    /// # Arguments
    /// * `count` - ドキュメント内のtokenの出現回数
    /// * `total` - ドキュメント内のtoken総数 (> 0)
    fn tf_calc(count: u32, total: u64) -> f64;

    /// IDFの計算
    ///
    /// # Arguments
    /// * `doc_num` - 全ドキュメント数
    /// * `doc_freq` - tokenを含むドキュメント数
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64;

    /// Per-document token -> TF maps. Documents without tokens give an empty map.
    fn tf_corpus<T>(tokens_per_doc: &[Vec<T>]) -> Vec<TermMap>
    where
        T: AsRef<str>,
    {
        tokens_per_doc
            .iter()
            .map(|doc| {
                let freq: TokenFrequency = doc.iter().collect();
                let total = freq.token_total_count();
                if total == 0 {
                    return TermMap::new();
                }
                freq.iter()
                    .map(|(token, count)| (token.to_string(), Self::tf_calc(count, total)))
                    .collect()
            })
            .collect()
    }

    /// IDF for every vocabulary token, in vocabulary order.
    /// Tokens absent from the corpus still get a weight (`doc_freq = 0`).
    fn idf(tf_corpus: &[TermMap], vocab: &Vocabulary) -> TermMap {
        let doc_num = tf_corpus.len() as u64;
        vocab
            .iter()
            .map(|token| {
                let doc_freq = tf_corpus
                    .iter()
                    .filter(|doc| doc.contains_key(token))
                    .count() as u64;
                (token.to_string(), Self::idf_calc(doc_num, doc_freq))
            })
            .collect()
    }

    /// tf × idf for every token of every document.
    /// A document token missing from `vocab` is kept with weight 0.
    fn tfidf_corpus(tf_corpus: &[TermMap], vocab: &Vocabulary) -> Vec<TermMap> {
        let idf_values = Self::idf(tf_corpus, vocab);
        tf_corpus
            .iter()
            .map(|doc| {
                doc.iter()
                    .map(|(token, &tf)| {
                        let idf = idf_values.get(token).copied().unwrap_or(0.0);
                        (token.clone(), tf * idf)
                    })
                    .collect()
            })
            .collect()
    }
}

/// デフォルトのTF-IDFエンジン
/// - tf = count / total
/// - idf = ln((N + 1) / (df + 1)) + 1 (smoothed, always > 0)
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf_calc(count: u32, total: u64) -> f64 {
        count as f64 / total as f64
    }

    #[inline]
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        ((doc_num as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
    }
}

/// コーパスの各ドキュメントを `all_ngrams` でtoken化 (順序を保持)
pub fn tokens_corpus<S>(corpus: &[S], opts: &AllNgramsOptions) -> Vec<Vec<Token>>
where
    S: AsRef<str> + Sync,
{
    corpus
        .par_iter()
        .map(|doc| all_ngrams(doc.as_ref(), opts))
        .collect()
}

/// count / document length per token
pub fn tf_corpus<T>(tokens_per_doc: &[Vec<T>]) -> Vec<TermMap>
where
    T: AsRef<str>,
{
    DefaultTFIDFEngine::tf_corpus(tokens_per_doc)
}

/// 全ドキュメントのtokenの和集合 (初出順)
pub fn vocabulary(tf_corpus: &[TermMap]) -> Vocabulary {
    let mut vocab = Vocabulary::new();
    for doc in tf_corpus {
        for token in doc.keys() {
            vocab.insert(token);
        }
    }
    vocab
}

/// Smoothed IDF of every vocabulary token.
pub fn idf(tf_corpus: &[TermMap], vocab: &Vocabulary) -> TermMap {
    DefaultTFIDFEngine::idf(tf_corpus, vocab)
}

pub fn tfidf_corpus(tf_corpus: &[TermMap], vocab: &Vocabulary) -> Vec<TermMap> {
    DefaultTFIDFEngine::tfidf_corpus(tf_corpus, vocab)
}

/// ドキュメントごとのsoftmax正規化
///
/// The document maximum is subtracted before exponentiating, so large or
/// negative weights stay finite. Each non-empty document sums to 1; an empty
/// document stays empty.
pub fn softmax_tfidf(docs: &[TermMap]) -> Vec<TermMap> {
    docs.iter()
        .map(|doc| {
            let Some(max) = doc.values().copied().reduce(f64::max) else {
                return TermMap::new();
            };
            let exps: Vec<f64> = doc.values().map(|&v| (v - max).exp()).collect();
            let sum: f64 = exps.iter().sum();
            doc.keys()
                .zip(exps)
                .map(|(token, e)| (token.clone(), e / sum))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> TermMap {
        entries.iter().map(|&(t, v)| (t.to_string(), v)).collect()
    }

    fn argmax(doc: &TermMap) -> &str {
        doc.iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(t, _)| t.as_str())
            .unwrap()
    }

    #[test]
    fn tf_is_relative_frequency() {
        let tokens = vec![vec!["a", "b", "a", "c"], vec![]];
        let tf = tf_corpus(&tokens);
        assert_eq!(tf.len(), 2);
        assert!((tf[0]["a"] - 0.5).abs() < 1e-12);
        assert!((tf[0]["b"] - 0.25).abs() < 1e-12);
        assert!(tf[1].is_empty());
    }

    #[test]
    fn vocabulary_is_union_in_first_seen_order() {
        let tf = tf_corpus(&[vec!["x", "y"], vec!["y", "z"]]);
        let vocab = vocabulary(&tf);
        assert_eq!(vocab.to_vec(), vec!["x", "y", "z"]);
    }

    #[test]
    fn smoothed_idf() {
        let tf = tf_corpus(&[vec!["a", "b"], vec!["a"], vec!["c"]]);
        let vocab = Vocabulary::from_tokens(["a", "b", "missing"]);
        let idf = idf(&tf, &vocab);
        // N = 3
        assert!((idf["a"] - ((4.0_f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf["b"] - ((4.0_f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf["missing"] - ((4.0_f64).ln() + 1.0)).abs() < 1e-12);
        assert!(idf.values().all(|&w| w > 0.0));
    }

    #[test]
    fn idf_on_empty_corpus() {
        let idf = idf(&[], &Vocabulary::from_tokens(["a"]));
        assert!((idf["a"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tfidf_emits_every_document_token() {
        let tf = tf_corpus(&[vec!["a", "b"], vec!["a"]]);
        let vocab = Vocabulary::from_tokens(["a"]);
        let out = tfidf_corpus(&tf, &vocab);
        assert_eq!(out[0].len(), 2);
        assert_eq!(out[0]["b"], 0.0);
        // a: tf 0.5, idf ln(3/3) + 1 = 1
        assert!((out[0]["a"] - 0.5).abs() < 1e-12);
        assert!((out[1]["a"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn softmax_sums_to_one() {
        let docs = vec![
            map(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]),
            map(&[("x", -1.0), ("y", -2.0), ("z", -3.0)]),
            map(&[("a", 0.0), ("b", 0.0)]),
            map(&[("x", 10.0), ("y", 0.0)]),
            map(&[("big", 1000.0), ("small", -1000.0)]),
        ];
        let out = softmax_tfidf(&docs);
        assert_eq!(out.len(), docs.len());
        for doc in &out {
            let sum: f64 = doc.values().sum();
            assert!((sum - 1.0).abs() < 1e-6);
            assert!(doc.values().all(|v| v.is_finite()));
        }
        assert_eq!(argmax(&out[0]), "c");
        assert_eq!(argmax(&out[1]), "x");
        assert_eq!(argmax(&out[3]), "x");
        assert!((out[2]["a"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn softmax_keeps_empty_documents_empty() {
        let out = softmax_tfidf(&[TermMap::new()]);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_empty());
    }

    #[test]
    fn tokens_corpus_preserves_order() {
        let corpus = ["abc", "", "xy"];
        let tokens = tokens_corpus(&corpus, &AllNgramsOptions::range(1, 2));
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], vec!["a", "b", "c", "ab", "bc"]);
        assert!(tokens[1].is_empty());
        assert_eq!(tokens[2], vec!["x", "y", "xy"]);
    }
}
