use serde::{Deserialize, Serialize};

/// 行優先の密行列
/// Rows are documents (or topics), columns are vocabulary tokens (or topics).
///
/// A matrix may have rows of length 0 (`cols == 0`) which is how an empty
/// vocabulary is represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// 0 で埋められた行列を作成
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Empty matrix, 0 x 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a row-major buffer.
    /// Returns `None` when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// 行のベクタから作成
    /// Returns `None` when the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n = rows.len();
        let data = rows.into_iter().flatten().collect();
        Some(Self {
            rows: n,
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// true when there are no rows
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// 行のスライス
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Column values, top to bottom.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col < self.cols {
            Some((0..self.rows).map(|r| self.data[r * self.cols + col]).collect())
        } else {
            None
        }
    }

    /// Iterate rows in order. Yields `rows()` slices even when `cols == 0`.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// 負の要素の位置 (最初のもの)
    pub fn first_negative(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|&v| v < 0.0)
            .map(|i| (i / self.cols, i % self.cols))
    }

    #[inline]
    pub fn is_non_negative(&self) -> bool {
        self.first_negative().is_none()
    }

    /// self * other
    pub fn matmul(&self, other: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.cols, other.rows);
        let mut out = DenseMatrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                let b_row = &other.data[k * other.cols..(k + 1) * other.cols];
                let out_row = &mut out.data[i * other.cols..(i + 1) * other.cols];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// selfᵀ * other
    pub fn transpose_matmul(&self, other: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.rows, other.rows);
        let mut out = DenseMatrix::zeros(self.cols, other.cols);
        for k in 0..self.rows {
            let a_row = &self.data[k * self.cols..(k + 1) * self.cols];
            let b_row = &other.data[k * other.cols..(k + 1) * other.cols];
            for (i, &a) in a_row.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                let out_row = &mut out.data[i * other.cols..(i + 1) * other.cols];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// self * otherᵀ
    pub fn matmul_transpose(&self, other: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.cols, other.cols);
        let mut out = DenseMatrix::zeros(self.rows, other.rows);
        for i in 0..self.rows {
            let a_row = &self.data[i * self.cols..(i + 1) * self.cols];
            for j in 0..other.rows {
                let b_row = &other.data[j * other.cols..(j + 1) * other.cols];
                out.data[i * other.rows + j] = a_row.iter().zip(b_row).map(|(a, b)| a * b).sum();
            }
        }
        out
    }

    /// フロベニウスノルムの二乗誤差 ||self - other||²
    pub fn squared_distance(&self, other: &DenseMatrix) -> f64 {
        debug_assert_eq!(self.shape(), other.shape());
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}
