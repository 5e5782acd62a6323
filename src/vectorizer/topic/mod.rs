pub mod nmf;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::matrix::DenseMatrix;
use crate::vectorizer::dense::sparse_to_dense;
use crate::vectorizer::ngram::AllNgramsOptions;
use crate::vectorizer::tfidf::{softmax_tfidf, tf_corpus, tfidf_corpus, tokens_corpus, vocabulary};
use crate::vectorizer::vocabulary::Vocabulary;

use self::nmf::{Factorizer, MultiplicativeNmf};

/// トピックモデル
/// Output of `reduce_dimensionality`.
///
/// - `doc_topic`: documents x topics, non-negative
/// - `topic_term`: topics x vocabulary, non-negative
/// - `vocabulary`: the column order of `topic_term`
///
/// A degenerate corpus (no document or no token) gives two empty matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModel {
    pub doc_topic: DenseMatrix,
    pub topic_term: DenseMatrix,
    pub vocabulary: Vocabulary,
}

/// 代表ドキュメントとそのトピックに属するドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroup {
    pub topic: usize,
    /// index of the topic's dominant document
    pub representative: usize,
    /// text of the representative document, for display
    pub label: String,
    /// documents whose dominant topic is `topic`, corpus order
    pub documents: Vec<String>,
}

impl TopicModel {
    fn empty(vocabulary: Vocabulary) -> Self {
        Self {
            doc_topic: DenseMatrix::empty(),
            topic_term: DenseMatrix::empty(),
            vocabulary,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.doc_topic.is_empty()
    }

    #[inline]
    pub fn n_documents(&self) -> usize {
        self.doc_topic.rows()
    }

    #[inline]
    pub fn n_topics(&self) -> usize {
        self.doc_topic.cols()
    }

    /// トピックの上位n語 (重み降順)
    pub fn top_terms(&self, topic: usize, n: usize) -> Result<Vec<(&str, f64)>> {
        let row = self.topic_term.row(topic).ok_or(Error::TopicOutOfRange {
            index: topic,
            len: self.topic_term.rows(),
        })?;
        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked
            .into_iter()
            .take(n)
            .filter_map(|(idx, w)| self.vocabulary.token_at(idx).map(|t| (t, w)))
            .collect())
    }

    pub fn dominant_topic_for_document(&self, doc: usize) -> Result<usize> {
        dominant_topic_for_document(&self.doc_topic, doc)
    }

    pub fn dominant_document_for_topic(&self, topic: usize) -> Result<usize> {
        dominant_document_for_topic(&self.doc_topic, topic)
    }

    pub fn documents_for_dominant_topic<'a, S>(
        &self,
        topic: usize,
        corpus: &'a [S],
    ) -> Result<Vec<&'a str>>
    where
        S: AsRef<str>,
    {
        documents_for_dominant_topic(&self.doc_topic, topic, corpus)
    }

    pub fn group_by_dominant_topic<S>(&self, corpus: &[S]) -> Result<Vec<TopicGroup>>
    where
        S: AsRef<str>,
    {
        group_by_dominant_topic(&self.doc_topic, corpus)
    }
}

/// 次元削減 (トピック抽出)
///
/// tokenize -> TF -> vocabulary -> TF-IDF -> softmax -> dense -> NMF, with the
/// default `MultiplicativeNmf`.
///
/// # Arguments
/// * `corpus` - ドキュメント
/// * `n_topics` - トピック数 (>= 1)
/// * `opts` - n-gramの範囲とオプション
pub fn reduce_dimensionality<S>(
    corpus: &[S],
    n_topics: usize,
    opts: &AllNgramsOptions,
) -> Result<TopicModel>
where
    S: AsRef<str> + Sync,
{
    reduce_dimensionality_with(corpus, n_topics, opts, &MultiplicativeNmf::default())
}

/// Same pipeline as `reduce_dimensionality` with a caller supplied factorizer.
///
/// An empty corpus or vocabulary returns empty matrices and never calls the
/// factorizer. Factors of the wrong shape are rejected.
pub fn reduce_dimensionality_with<S, F>(
    corpus: &[S],
    n_topics: usize,
    opts: &AllNgramsOptions,
    factorizer: &F,
) -> Result<TopicModel>
where
    S: AsRef<str> + Sync,
    F: Factorizer + ?Sized,
{
    let tokens = tokens_corpus(corpus, opts);
    let tf = tf_corpus(&tokens);
    let vocab = vocabulary(&tf);
    if corpus.is_empty() || vocab.is_empty() {
        debug!(documents = corpus.len(), "degenerate corpus, skipping factorization");
        return Ok(TopicModel::empty(vocab));
    }
    if n_topics == 0 {
        return Err(Error::InvalidTopicCount);
    }

    let tfidf = tfidf_corpus(&tf, &vocab);
    let softmax = softmax_tfidf(&tfidf);
    let dense = sparse_to_dense(&softmax, &vocab);
    let (doc_topic, topic_term) = factorizer.factorize(&dense, n_topics)?;
    check_shape("W", &doc_topic, corpus.len(), n_topics)?;
    check_shape("H", &topic_term, n_topics, vocab.len())?;

    debug!(
        documents = corpus.len(),
        vocabulary = vocab.len(),
        topics = n_topics,
        "reduced corpus to topics"
    );
    Ok(TopicModel {
        doc_topic,
        topic_term,
        vocabulary: vocab,
    })
}

fn check_shape(
    name: &'static str,
    m: &DenseMatrix,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<()> {
    if m.shape() != (expected_rows, expected_cols) {
        return Err(Error::FactorShape {
            name,
            rows: m.rows(),
            cols: m.cols(),
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}

/// 最大値を取るインデックスの集合
fn argmax_set(values: impl Iterator<Item = f64>) -> Vec<usize> {
    let mut best = f64::NEG_INFINITY;
    let mut set = Vec::new();
    for (idx, v) in values.enumerate() {
        if v > best {
            best = v;
            set.clear();
            set.push(idx);
        } else if v == best {
            set.push(idx);
        }
    }
    set
}

/// All topics reaching the maximum weight of document `doc`.
pub fn dominant_topics_for_document(w: &DenseMatrix, doc: usize) -> Result<Vec<usize>> {
    let row = w.row(doc).ok_or(Error::DocumentOutOfRange {
        index: doc,
        len: w.rows(),
    })?;
    Ok(argmax_set(row.iter().copied()))
}

/// All documents reaching the maximum weight of topic `topic`.
pub fn dominant_documents_for_topic(w: &DenseMatrix, topic: usize) -> Result<Vec<usize>> {
    let column = w.column(topic).ok_or(Error::TopicOutOfRange {
        index: topic,
        len: w.cols(),
    })?;
    Ok(argmax_set(column.into_iter()))
}

/// ドキュメントの支配的トピック
/// Ties are broken uniformly at random among the maximal topics.
pub fn dominant_topic_for_document(w: &DenseMatrix, doc: usize) -> Result<usize> {
    dominant_topic_for_document_with_rng(w, doc, &mut rand::rng())
}

pub fn dominant_topic_for_document_with_rng<R>(
    w: &DenseMatrix,
    doc: usize,
    rng: &mut R,
) -> Result<usize>
where
    R: Rng + ?Sized,
{
    let ties = dominant_topics_for_document(w, doc)?;
    pick(&ties, w, rng)
}

/// トピックの支配的ドキュメント
/// Ties are broken uniformly at random among the maximal documents.
pub fn dominant_document_for_topic(w: &DenseMatrix, topic: usize) -> Result<usize> {
    dominant_document_for_topic_with_rng(w, topic, &mut rand::rng())
}

pub fn dominant_document_for_topic_with_rng<R>(
    w: &DenseMatrix,
    topic: usize,
    rng: &mut R,
) -> Result<usize>
where
    R: Rng + ?Sized,
{
    let ties = dominant_documents_for_topic(w, topic)?;
    pick(&ties, w, rng)
}

/// 同点の中から一様に選ぶ
/// The tie set is only empty when the scanned axis has length 0.
fn pick<R>(ties: &[usize], w: &DenseMatrix, rng: &mut R) -> Result<usize>
where
    R: Rng + ?Sized,
{
    ties.choose(rng).copied().ok_or(Error::EmptyMatrix {
        rows: w.rows(),
        cols: w.cols(),
    })
}

/// Dominant topic of every corpus document, one random draw per document.
fn assign_topics<S, R>(w: &DenseMatrix, corpus: &[S], rng: &mut R) -> Result<Vec<usize>>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    (0..corpus.len())
        .map(|doc| dominant_topic_for_document_with_rng(w, doc, rng))
        .collect()
}

/// 支配的トピックが `topic` であるドキュメント (コーパス順)
pub fn documents_for_dominant_topic<'a, S>(
    w: &DenseMatrix,
    topic: usize,
    corpus: &'a [S],
) -> Result<Vec<&'a str>>
where
    S: AsRef<str>,
{
    if topic >= w.cols() {
        return Err(Error::TopicOutOfRange {
            index: topic,
            len: w.cols(),
        });
    }
    let assigned = assign_topics(w, corpus, &mut rand::rng())?;
    Ok(corpus
        .iter()
        .zip(assigned)
        .filter(|(_, t)| *t == topic)
        .map(|(doc, _)| doc.as_ref())
        .collect())
}

/// トピックごとにドキュメントをまとめる
///
/// One group per topic, in topic order. Each document is assigned to exactly
/// one topic. Groups are keyed by topic index, so two topics sharing the same
/// representative document stay separate. A matrix without topic columns
/// (the model of a degenerate corpus) gives no group.
pub fn group_by_dominant_topic<S>(w: &DenseMatrix, corpus: &[S]) -> Result<Vec<TopicGroup>>
where
    S: AsRef<str>,
{
    if w.cols() == 0 {
        return Ok(Vec::new());
    }
    let mut rng = rand::rng();
    let assigned = assign_topics(w, corpus, &mut rng)?;
    (0..w.cols())
        .map(|topic| -> Result<TopicGroup> {
            let representative = dominant_document_for_topic_with_rng(w, topic, &mut rng)?;
            let label = corpus
                .get(representative)
                .ok_or(Error::DocumentOutOfRange {
                    index: representative,
                    len: corpus.len(),
                })?
                .as_ref()
                .to_string();
            let documents = corpus
                .iter()
                .zip(&assigned)
                .filter(|(_, t)| **t == topic)
                .map(|(doc, _)| doc.as_ref().to_string())
                .collect();
            Ok(TopicGroup {
                topic,
                representative,
                label,
                documents,
            })
        })
        .collect()
}
