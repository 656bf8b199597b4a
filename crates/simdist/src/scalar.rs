//! Portable scalar kernels.
//!
//! Always registered last in every candidate list, so these run on any
//! hardware and serve as the reference the SIMD kernels are tested against.

/// Squared Euclidean distance raw sum.
pub(crate) fn sqeuclidean(a: &[f32], b: &[f32]) -> f32 {
  a.iter()
    .zip(b)
    .map(|(&x, &y)| {
      let d = x - y;
      d * d
    })
    .sum()
}

/// Manhattan distance raw sum.
pub(crate) fn manhattan(a: &[f32], b: &[f32]) -> f32 {
  a.iter().zip(b).map(|(&x, &y)| (x - y).abs()).sum()
}

/// Dot product raw sum.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
  a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

/// Cosine raw sums: `(dot, norm_a_sq, norm_b_sq)` in one pass.
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  let mut dot = 0.0f32;
  let mut norm_a = 0.0f32;
  let mut norm_b = 0.0f32;
  for (&x, &y) in a.iter().zip(b) {
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }
  (dot, norm_a, norm_b)
}

/// Hamming distance: popcount of the bytewise XOR.
pub(crate) fn hamming(a: &[u8], b: &[u8]) -> u64 {
  a.iter()
    .zip(b)
    .map(|(&x, &y)| u64::from((x ^ y).count_ones()))
    .sum()
}

/// Jaccard raw integer sums: `(dot, norm_a_sq, norm_b_sq)`.
///
/// Products of u16 values fit u32; the u64 accumulators are exact for any
/// realistic length.
pub(crate) fn jaccard(a: &[u16], b: &[u16]) -> (u64, u64, u64) {
  let mut dot = 0u64;
  let mut norm_a = 0u64;
  let mut norm_b = 0u64;
  for (&x, &y) in a.iter().zip(b) {
    let x = u64::from(x);
    let y = u64::from(y);
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }
  (dot, norm_a, norm_b)
}

/// Squared L2 norm, accumulated in f64 for headroom.
pub(crate) fn norm_sq(v: &[f32]) -> f64 {
  v.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
}
