use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::utils::math::matrix::DenseMatrix;

/// 非負値行列因子分解のインターフェース
///
/// `factorize(V, k)` returns `(W, H)` with `W` of shape `rows x k`, `H` of
/// shape `k x cols`, both entrywise non-negative and `W * H ≈ V`.
/// Convergence criteria belong to the implementation.
pub trait Factorizer {
    fn factorize(&self, matrix: &DenseMatrix, k: usize) -> Result<(DenseMatrix, DenseMatrix)>;
}

/// 乗法的更新NMFの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmfConfig {
    pub max_iter: usize,
    /// stop once the relative change of the reconstruction error drops below this
    pub tolerance: f64,
    /// added to every update denominator
    pub epsilon: f64,
    /// seed of the initial W and H
    pub seed: u64,
}

impl Default for NmfConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tolerance: 1e-6,
            epsilon: 1e-10,
            seed: 42,
        }
    }
}

/// Lee & Seung の乗法的更新によるNMF (フロベニウス損失)
///
/// Initialization is seeded, so the same matrix and config always give the
/// same factors.
#[derive(Debug, Clone, Default)]
pub struct MultiplicativeNmf {
    pub config: NmfConfig,
}

impl MultiplicativeNmf {
    pub fn new(config: NmfConfig) -> Self {
        Self { config }
    }

    fn init(&self, rows: usize, cols: usize, k: usize, mean: f64) -> (DenseMatrix, DenseMatrix) {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let scale = (mean / k as f64).sqrt();
        let mut w = DenseMatrix::zeros(rows, k);
        let mut h = DenseMatrix::zeros(k, cols);
        w.as_mut_slice()
            .iter_mut()
            .for_each(|x| *x = scale * rng.random::<f64>());
        h.as_mut_slice()
            .iter_mut()
            .for_each(|x| *x = scale * rng.random::<f64>());
        (w, h)
    }

    /// H ← H ⊙ (WᵀV) / (WᵀWH + ε)
    fn update_h(&self, v: &DenseMatrix, w: &DenseMatrix, h: &mut DenseMatrix) {
        let numer = w.transpose_matmul(v);
        let denom = w.transpose_matmul(w).matmul(h);
        let eps = self.config.epsilon;
        h.as_mut_slice()
            .iter_mut()
            .zip(numer.as_slice().iter().zip(denom.as_slice()))
            .for_each(|(x, (n, d))| *x *= n / (d + eps));
    }

    /// W ← W ⊙ (VHᵀ) / (WHHᵀ + ε), one row per task
    fn update_w(&self, v: &DenseMatrix, w: &mut DenseMatrix, h: &DenseMatrix) {
        let k = h.rows();
        let numer = v.matmul_transpose(h);
        let hht = h.matmul_transpose(h);
        let eps = self.config.epsilon;
        w.as_mut_slice()
            .par_chunks_mut(k)
            .zip(numer.as_slice().par_chunks(k))
            .for_each(|(row, numer_row)| {
                let old = row.to_vec();
                for j in 0..k {
                    let denom: f64 = (0..k).map(|l| old[l] * hht.as_slice()[l * k + j]).sum();
                    row[j] = old[j] * numer_row[j] / (denom + eps);
                }
            });
    }
}

impl Factorizer for MultiplicativeNmf {
    fn factorize(&self, matrix: &DenseMatrix, k: usize) -> Result<(DenseMatrix, DenseMatrix)> {
        if k == 0 {
            return Err(Error::InvalidTopicCount);
        }
        if let Some((row, col)) = matrix.first_negative() {
            return Err(Error::NegativeEntry { row, col });
        }
        let (rows, cols) = matrix.shape();
        if rows == 0 || cols == 0 {
            return Ok((DenseMatrix::zeros(rows, k), DenseMatrix::zeros(k, cols)));
        }

        let mean = matrix.as_slice().iter().sum::<f64>() / (rows * cols) as f64;
        let (mut w, mut h) = self.init(rows, cols, k, mean);

        let mut prev_err = matrix.squared_distance(&w.matmul(&h));
        let mut iterations = 0;
        for iter in 0..self.config.max_iter {
            self.update_h(matrix, &w, &mut h);
            self.update_w(matrix, &mut w, &h);
            iterations = iter + 1;

            let err = matrix.squared_distance(&w.matmul(&h));
            trace!(iter, err, "nmf iteration");
            // 収束判定
            if (prev_err - err).abs() <= self.config.tolerance * prev_err.max(self.config.epsilon) {
                prev_err = err;
                break;
            }
            prev_err = err;
        }
        debug!(rows, cols, k, iterations, error = prev_err, "nmf finished");
        Ok((w, h))
    }
}
