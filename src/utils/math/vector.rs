use num::Num;

/// dot積
/// d(a, b) = Σ(a_i * b_i)
/// Only the first `min(a.len(), b.len())` elements take part.
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.into() * y.into())
        .sum()
}

/// ユークリッドノルム
/// ||a|| = sqrt(Σ(a_i^2))
#[inline]
pub fn l2_norm<N>(v: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    v.iter()
        .map(|&x| {
            let x: f64 = x.into();
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Divide every element by the Euclidean norm.
/// A zero vector is left untouched.
#[inline]
pub fn l2_normalize(v: &mut [f64]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// コサイン類似度
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// The longer vector is silently truncated to the length of the shorter one,
/// norms included. Returns 0.0 when either truncated vector has zero norm.
///
/// # Arguments
/// * `a` - ベクトル
/// * `b` - 比較対象のベクトル
///
/// # Returns
/// * `f64` - [-1.0, 1.0] の類似度
#[inline]
pub fn cosine<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
