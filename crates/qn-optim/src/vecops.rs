//! Small dense-vector kernels shared by every strategy.

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean (L2) norm.
#[inline]
pub fn norm_l2(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `-a`, as a new vector.
#[inline]
pub fn flip_sign(a: &[f64]) -> Vec<f64> {
    a.iter().map(|&v| -v).collect()
}
