use crate::utils::math::matrix::DenseMatrix;
use crate::vectorizer::vocabulary::Vocabulary;
use crate::vectorizer::TermMap;

/// 疎なtoken->重みマップを密行列に変換する
///
/// One row per document, one column per vocabulary token in vocabulary
/// order. Document tokens outside the vocabulary are ignored and missing
/// tokens are 0.
///
/// # Arguments
/// * `sparse_docs` - ドキュメントごとの疎マップ
/// * `vocab` - 列の順序を決める語彙
///
/// # Returns
/// * `DenseMatrix` - `sparse_docs.len()` x `vocab.len()`
pub fn sparse_to_dense(sparse_docs: &[TermMap], vocab: &Vocabulary) -> DenseMatrix {
    let cols = vocab.len();
    let mut dense = DenseMatrix::zeros(sparse_docs.len(), cols);
    for (row, doc) in sparse_docs.iter().enumerate() {
        for (token, &value) in doc {
            if let Some(col) = vocab.index_of(token) {
                dense.set(row, col, value);
            }
        }
    }
    dense
}
