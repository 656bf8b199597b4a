//! x86_64 SIMD kernels.
//!
//! Each kernel is an `unsafe` inner function carrying `#[target_feature]`
//! plus a safe thin wrapper. The wrappers are only reachable through the
//! dispatcher, which has already verified the required capabilities, so the
//! single `unsafe` block in each wrapper discharges the feature precondition.
//!
//! Shape is uniform: accumulate full lanes at native width, horizontal
//! reduce, then a scalar loop over the remainder. Raw sums only; validation
//! and finishing math happen in the public entry points.

#![allow(clippy::missing_safety_doc)]

use core::arch::x86_64::*;

// ─────────────────────────────────────────────────────────────────────────────
// Horizontal reductions
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "avx")]
unsafe fn hsum256_ps(v: __m256) -> f32 {
  let lo = _mm256_castps256_ps128(v);
  let hi = _mm256_extractf128_ps::<1>(v);
  let sum4 = _mm_add_ps(lo, hi);
  let sum2 = _mm_add_ps(sum4, _mm_movehl_ps(sum4, sum4));
  let sum1 = _mm_add_ss(sum2, _mm_shuffle_ps::<0b01>(sum2, sum2));
  _mm_cvtss_f32(sum1)
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn hsum256_pd(v: __m256d) -> f64 {
  let lo = _mm256_castpd256_pd128(v);
  let hi = _mm256_extractf128_pd::<1>(v);
  let sum2 = _mm_add_pd(lo, hi);
  _mm_cvtsd_f64(_mm_add_sd(sum2, _mm_unpackhi_pd(sum2, sum2)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum256_epi64(v: __m256i) -> u64 {
  let lo = _mm256_castsi256_si128(v);
  let hi = _mm256_extracti128_si256::<1>(v);
  let sum2 = _mm_add_epi64(lo, hi);
  (_mm_extract_epi64::<0>(sum2) as u64).wrapping_add(_mm_extract_epi64::<1>(sum2) as u64)
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX (256-bit float, no FMA)
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "avx")]
unsafe fn sqeuclidean_avx_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 8;
  let mut acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    let d = _mm256_sub_ps(va, vb);
    acc = _mm256_add_ps(acc, _mm256_mul_ps(d, d));
  }
  let mut sum = hsum256_ps(acc);
  for i in chunks * 8..a.len() {
    let d = a[i] - b[i];
    sum += d * d;
  }
  sum
}

#[target_feature(enable = "avx")]
unsafe fn manhattan_avx_impl(a: &[f32], b: &[f32]) -> f32 {
  // Clearing the sign bit is abs for IEEE floats.
  let sign_mask = _mm256_set1_ps(-0.0);
  let chunks = a.len() / 8;
  let mut acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    let d = _mm256_sub_ps(va, vb);
    acc = _mm256_add_ps(acc, _mm256_andnot_ps(sign_mask, d));
  }
  let mut sum = hsum256_ps(acc);
  for i in chunks * 8..a.len() {
    sum += (a[i] - b[i]).abs();
  }
  sum
}

#[target_feature(enable = "avx")]
unsafe fn dot_avx_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 8;
  let mut acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    acc = _mm256_add_ps(acc, _mm256_mul_ps(va, vb));
  }
  let mut sum = hsum256_ps(acc);
  for i in chunks * 8..a.len() {
    sum += a[i] * b[i];
  }
  sum
}

#[target_feature(enable = "avx")]
unsafe fn cosine_avx_impl(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  let chunks = a.len() / 8;
  let mut dot_acc = _mm256_setzero_ps();
  let mut na_acc = _mm256_setzero_ps();
  let mut nb_acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    dot_acc = _mm256_add_ps(dot_acc, _mm256_mul_ps(va, vb));
    na_acc = _mm256_add_ps(na_acc, _mm256_mul_ps(va, va));
    nb_acc = _mm256_add_ps(nb_acc, _mm256_mul_ps(vb, vb));
  }
  let mut dot = hsum256_ps(dot_acc);
  let mut norm_a = hsum256_ps(na_acc);
  let mut norm_b = hsum256_ps(nb_acc);
  for i in chunks * 8..a.len() {
    dot += a[i] * b[i];
    norm_a += a[i] * a[i];
    norm_b += b[i] * b[i];
  }
  (dot, norm_a, norm_b)
}

#[target_feature(enable = "avx")]
unsafe fn norm_sq_avx_impl(v: &[f32]) -> f64 {
  // Widen to f64 before squaring; matches the scalar kernel's headroom.
  let chunks = v.len() / 4;
  let mut acc = _mm256_setzero_pd();
  for i in 0..chunks {
    let x = _mm256_cvtps_pd(_mm_loadu_ps(v.as_ptr().add(i * 4)));
    acc = _mm256_add_pd(acc, _mm256_mul_pd(x, x));
  }
  let mut sum = hsum256_pd(acc);
  for &x in &v[chunks * 4..] {
    sum += f64::from(x) * f64::from(x);
  }
  sum
}

pub(crate) fn sqeuclidean_avx(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX before selecting this kernel.
  unsafe { sqeuclidean_avx_impl(a, b) }
}

pub(crate) fn manhattan_avx(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX before selecting this kernel.
  unsafe { manhattan_avx_impl(a, b) }
}

pub(crate) fn dot_avx(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX before selecting this kernel.
  unsafe { dot_avx_impl(a, b) }
}

pub(crate) fn cosine_avx(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  // SAFETY: dispatch verified AVX before selecting this kernel.
  unsafe { cosine_avx_impl(a, b) }
}

pub(crate) fn norm_sq_avx(v: &[f32]) -> f64 {
  // SAFETY: dispatch verified AVX before selecting this kernel.
  unsafe { norm_sq_avx_impl(v) }
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX2 + FMA
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "avx2,fma")]
unsafe fn sqeuclidean_avx2_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 8;
  let mut acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    let d = _mm256_sub_ps(va, vb);
    acc = _mm256_fmadd_ps(d, d, acc);
  }
  let mut sum = hsum256_ps(acc);
  for i in chunks * 8..a.len() {
    let d = a[i] - b[i];
    sum += d * d;
  }
  sum
}

#[target_feature(enable = "avx2,fma")]
unsafe fn dot_avx2_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 8;
  let mut acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    acc = _mm256_fmadd_ps(va, vb, acc);
  }
  let mut sum = hsum256_ps(acc);
  for i in chunks * 8..a.len() {
    sum += a[i] * b[i];
  }
  sum
}

#[target_feature(enable = "avx2,fma")]
unsafe fn cosine_avx2_impl(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  let chunks = a.len() / 8;
  let mut dot_acc = _mm256_setzero_ps();
  let mut na_acc = _mm256_setzero_ps();
  let mut nb_acc = _mm256_setzero_ps();
  for i in 0..chunks {
    let va = _mm256_loadu_ps(a.as_ptr().add(i * 8));
    let vb = _mm256_loadu_ps(b.as_ptr().add(i * 8));
    dot_acc = _mm256_fmadd_ps(va, vb, dot_acc);
    na_acc = _mm256_fmadd_ps(va, va, na_acc);
    nb_acc = _mm256_fmadd_ps(vb, vb, nb_acc);
  }
  let mut dot = hsum256_ps(dot_acc);
  let mut norm_a = hsum256_ps(na_acc);
  let mut norm_b = hsum256_ps(nb_acc);
  for i in chunks * 8..a.len() {
    dot += a[i] * b[i];
    norm_a += a[i] * a[i];
    norm_b += b[i] * b[i];
  }
  (dot, norm_a, norm_b)
}

#[target_feature(enable = "avx2")]
unsafe fn hamming_avx2_impl(a: &[u8], b: &[u8]) -> u64 {
  let chunks = a.len() / 32;
  let mut total = 0u64;
  for i in 0..chunks {
    let va = _mm256_loadu_si256(a.as_ptr().add(i * 32).cast());
    let vb = _mm256_loadu_si256(b.as_ptr().add(i * 32).cast());
    let x = _mm256_xor_si256(va, vb);
    total += u64::from((_mm256_extract_epi64::<0>(x) as u64).count_ones());
    total += u64::from((_mm256_extract_epi64::<1>(x) as u64).count_ones());
    total += u64::from((_mm256_extract_epi64::<2>(x) as u64).count_ones());
    total += u64::from((_mm256_extract_epi64::<3>(x) as u64).count_ones());
  }
  for i in chunks * 32..a.len() {
    total += u64::from((a[i] ^ b[i]).count_ones());
  }
  total
}

/// Widen u32 products to u64 lanes and add into `acc`.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn add_widened_epi64(acc: __m256i, prod: __m256i) -> __m256i {
  let lo = _mm256_cvtepu32_epi64(_mm256_castsi256_si128(prod));
  let hi = _mm256_cvtepu32_epi64(_mm256_extracti128_si256::<1>(prod));
  _mm256_add_epi64(acc, _mm256_add_epi64(lo, hi))
}

#[target_feature(enable = "avx2")]
unsafe fn jaccard_avx2_impl(a: &[u16], b: &[u16]) -> (u64, u64, u64) {
  // u16 * u16 fits u32, so mullo on zero-extended lanes is exact.
  let chunks = a.len() / 8;
  let mut dot_acc = _mm256_setzero_si256();
  let mut na_acc = _mm256_setzero_si256();
  let mut nb_acc = _mm256_setzero_si256();
  for i in 0..chunks {
    let va = _mm256_cvtepu16_epi32(_mm_loadu_si128(a.as_ptr().add(i * 8).cast()));
    let vb = _mm256_cvtepu16_epi32(_mm_loadu_si128(b.as_ptr().add(i * 8).cast()));
    dot_acc = add_widened_epi64(dot_acc, _mm256_mullo_epi32(va, vb));
    na_acc = add_widened_epi64(na_acc, _mm256_mullo_epi32(va, va));
    nb_acc = add_widened_epi64(nb_acc, _mm256_mullo_epi32(vb, vb));
  }
  let mut dot = hsum256_epi64(dot_acc);
  let mut norm_a = hsum256_epi64(na_acc);
  let mut norm_b = hsum256_epi64(nb_acc);
  for i in chunks * 8..a.len() {
    let x = u64::from(a[i]);
    let y = u64::from(b[i]);
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }
  (dot, norm_a, norm_b)
}

pub(crate) fn sqeuclidean_avx2(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX2+FMA before selecting this kernel.
  unsafe { sqeuclidean_avx2_impl(a, b) }
}

pub(crate) fn dot_avx2(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX2+FMA before selecting this kernel.
  unsafe { dot_avx2_impl(a, b) }
}

pub(crate) fn cosine_avx2(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  // SAFETY: dispatch verified AVX2+FMA before selecting this kernel.
  unsafe { cosine_avx2_impl(a, b) }
}

pub(crate) fn hamming_avx2(a: &[u8], b: &[u8]) -> u64 {
  // SAFETY: dispatch verified AVX2 before selecting this kernel.
  unsafe { hamming_avx2_impl(a, b) }
}

pub(crate) fn jaccard_avx2(a: &[u16], b: &[u16]) -> (u64, u64, u64) {
  // SAFETY: dispatch verified AVX2 before selecting this kernel.
  unsafe { jaccard_avx2_impl(a, b) }
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX-512
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "avx512f")]
unsafe fn sqeuclidean_avx512_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 16;
  let mut acc = _mm512_setzero_ps();
  for i in 0..chunks {
    let va = _mm512_loadu_ps(a.as_ptr().add(i * 16));
    let vb = _mm512_loadu_ps(b.as_ptr().add(i * 16));
    let d = _mm512_sub_ps(va, vb);
    acc = _mm512_fmadd_ps(d, d, acc);
  }
  let mut sum = _mm512_reduce_add_ps(acc);
  for i in chunks * 16..a.len() {
    let d = a[i] - b[i];
    sum += d * d;
  }
  sum
}

#[target_feature(enable = "avx512f")]
unsafe fn manhattan_avx512_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 16;
  let mut acc = _mm512_setzero_ps();
  for i in 0..chunks {
    let va = _mm512_loadu_ps(a.as_ptr().add(i * 16));
    let vb = _mm512_loadu_ps(b.as_ptr().add(i * 16));
    acc = _mm512_add_ps(acc, _mm512_abs_ps(_mm512_sub_ps(va, vb)));
  }
  let mut sum = _mm512_reduce_add_ps(acc);
  for i in chunks * 16..a.len() {
    sum += (a[i] - b[i]).abs();
  }
  sum
}

#[target_feature(enable = "avx512f")]
unsafe fn dot_avx512_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 16;
  let mut acc = _mm512_setzero_ps();
  for i in 0..chunks {
    let va = _mm512_loadu_ps(a.as_ptr().add(i * 16));
    let vb = _mm512_loadu_ps(b.as_ptr().add(i * 16));
    acc = _mm512_fmadd_ps(va, vb, acc);
  }
  let mut sum = _mm512_reduce_add_ps(acc);
  for i in chunks * 16..a.len() {
    sum += a[i] * b[i];
  }
  sum
}

#[target_feature(enable = "avx512f")]
unsafe fn cosine_avx512_impl(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  let chunks = a.len() / 16;
  let mut dot_acc = _mm512_setzero_ps();
  let mut na_acc = _mm512_setzero_ps();
  let mut nb_acc = _mm512_setzero_ps();
  for i in 0..chunks {
    let va = _mm512_loadu_ps(a.as_ptr().add(i * 16));
    let vb = _mm512_loadu_ps(b.as_ptr().add(i * 16));
    dot_acc = _mm512_fmadd_ps(va, vb, dot_acc);
    na_acc = _mm512_fmadd_ps(va, va, na_acc);
    nb_acc = _mm512_fmadd_ps(vb, vb, nb_acc);
  }
  let mut dot = _mm512_reduce_add_ps(dot_acc);
  let mut norm_a = _mm512_reduce_add_ps(na_acc);
  let mut norm_b = _mm512_reduce_add_ps(nb_acc);
  for i in chunks * 16..a.len() {
    dot += a[i] * b[i];
    norm_a += a[i] * a[i];
    norm_b += b[i] * b[i];
  }
  (dot, norm_a, norm_b)
}

#[target_feature(enable = "avx512f")]
unsafe fn norm_sq_avx512_impl(v: &[f32]) -> f64 {
  let chunks = v.len() / 8;
  let mut acc = _mm512_setzero_pd();
  for i in 0..chunks {
    let x = _mm512_cvtps_pd(_mm256_loadu_ps(v.as_ptr().add(i * 8)));
    acc = _mm512_fmadd_pd(x, x, acc);
  }
  let mut sum = _mm512_reduce_add_pd(acc);
  for &x in &v[chunks * 8..] {
    sum += f64::from(x) * f64::from(x);
  }
  sum
}

#[target_feature(enable = "avx512f,avx512vpopcntdq")]
unsafe fn hamming_avx512_impl(a: &[u8], b: &[u8]) -> u64 {
  let chunks = a.len() / 64;
  let mut acc = _mm512_setzero_si512();
  for i in 0..chunks {
    let va = _mm512_loadu_si512(a.as_ptr().add(i * 64).cast());
    let vb = _mm512_loadu_si512(b.as_ptr().add(i * 64).cast());
    acc = _mm512_add_epi64(acc, _mm512_popcnt_epi64(_mm512_xor_si512(va, vb)));
  }
  let mut total = _mm512_reduce_add_epi64(acc) as u64;
  for i in chunks * 64..a.len() {
    total += u64::from((a[i] ^ b[i]).count_ones());
  }
  total
}

pub(crate) fn sqeuclidean_avx512(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX-512F before selecting this kernel.
  unsafe { sqeuclidean_avx512_impl(a, b) }
}

pub(crate) fn manhattan_avx512(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX-512F before selecting this kernel.
  unsafe { manhattan_avx512_impl(a, b) }
}

pub(crate) fn dot_avx512(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified AVX-512F before selecting this kernel.
  unsafe { dot_avx512_impl(a, b) }
}

pub(crate) fn cosine_avx512(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  // SAFETY: dispatch verified AVX-512F before selecting this kernel.
  unsafe { cosine_avx512_impl(a, b) }
}

pub(crate) fn norm_sq_avx512(v: &[f32]) -> f64 {
  // SAFETY: dispatch verified AVX-512F before selecting this kernel.
  unsafe { norm_sq_avx512_impl(v) }
}

pub(crate) fn hamming_avx512(a: &[u8], b: &[u8]) -> u64 {
  // SAFETY: dispatch verified AVX-512F+VPOPCNTDQ before selecting this kernel.
  unsafe { hamming_avx512_impl(a, b) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scalar;

  // Lengths straddling every lane width, including zero and tails.
  const LENGTHS: [usize; 10] = [0, 1, 3, 7, 8, 15, 16, 17, 63, 130];

  fn vectors(len: usize) -> (Vec<f32>, Vec<f32>) {
    let a: Vec<f32> = (0..len).map(|i| (i as f32).sin() * 10.0).collect();
    let b: Vec<f32> = (0..len).map(|i| (i as f32).cos() * 10.0).collect();
    (a, b)
  }

  fn close(x: f32, y: f32) {
    let tol = 1e-4 * x.abs().max(y.abs()).max(1.0);
    assert!((x - y).abs() <= tol, "{x} vs {y}");
  }

  #[test]
  fn avx_matches_scalar() {
    if !std::arch::is_x86_feature_detected!("avx") {
      return;
    }
    for len in LENGTHS {
      let (a, b) = vectors(len);
      close(sqeuclidean_avx(&a, &b), scalar::sqeuclidean(&a, &b));
      close(manhattan_avx(&a, &b), scalar::manhattan(&a, &b));
      close(dot_avx(&a, &b), scalar::dot(&a, &b));
      let (d0, na0, nb0) = cosine_avx(&a, &b);
      let (d1, na1, nb1) = scalar::cosine(&a, &b);
      close(d0, d1);
      close(na0, na1);
      close(nb0, nb1);
      let ns = norm_sq_avx(&a);
      assert!((ns - scalar::norm_sq(&a)).abs() <= 1e-6 * ns.abs().max(1.0));
    }
  }

  #[test]
  fn avx2_matches_scalar() {
    if !std::arch::is_x86_feature_detected!("avx2") || !std::arch::is_x86_feature_detected!("fma") {
      return;
    }
    for len in LENGTHS {
      let (a, b) = vectors(len);
      close(sqeuclidean_avx2(&a, &b), scalar::sqeuclidean(&a, &b));
      close(dot_avx2(&a, &b), scalar::dot(&a, &b));
      let (d0, na0, nb0) = cosine_avx2(&a, &b);
      let (d1, na1, nb1) = scalar::cosine(&a, &b);
      close(d0, d1);
      close(na0, na1);
      close(nb0, nb1);

      let bytes_a: Vec<u8> = (0..len).map(|i| (i * 37) as u8).collect();
      let bytes_b: Vec<u8> = (0..len).map(|i| (i * 101 + 5) as u8).collect();
      assert_eq!(hamming_avx2(&bytes_a, &bytes_b), scalar::hamming(&bytes_a, &bytes_b));

      let words_a: Vec<u16> = (0..len).map(|i| (i * 7919) as u16).collect();
      let words_b: Vec<u16> = (0..len).map(|i| (i * 104729 + 13) as u16).collect();
      assert_eq!(jaccard_avx2(&words_a, &words_b), scalar::jaccard(&words_a, &words_b));
    }
  }

  #[test]
  fn avx512_matches_scalar() {
    if !std::arch::is_x86_feature_detected!("avx512f") {
      return;
    }
    for len in LENGTHS {
      let (a, b) = vectors(len);
      close(sqeuclidean_avx512(&a, &b), scalar::sqeuclidean(&a, &b));
      close(manhattan_avx512(&a, &b), scalar::manhattan(&a, &b));
      close(dot_avx512(&a, &b), scalar::dot(&a, &b));
      let (d0, na0, nb0) = cosine_avx512(&a, &b);
      let (d1, na1, nb1) = scalar::cosine(&a, &b);
      close(d0, d1);
      close(na0, na1);
      close(nb0, nb1);
      let ns = norm_sq_avx512(&a);
      assert!((ns - scalar::norm_sq(&a)).abs() <= 1e-6 * ns.abs().max(1.0));
    }
  }

  #[test]
  fn avx512_popcount_matches_scalar() {
    if !std::arch::is_x86_feature_detected!("avx512f")
      || !std::arch::is_x86_feature_detected!("avx512vpopcntdq")
    {
      return;
    }
    for len in LENGTHS {
      let a: Vec<u8> = (0..len).map(|i| (i * 37) as u8).collect();
      let b: Vec<u8> = (0..len).map(|i| (i * 101 + 5) as u8).collect();
      assert_eq!(hamming_avx512(&a, &b), scalar::hamming(&a, &b));
    }
  }
}
