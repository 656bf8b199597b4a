//! aarch64 NEON kernels.
//!
//! NEON is architecturally guaranteed on AArch64, but the kernels keep the
//! same inner-function-plus-wrapper shape as x86_64 so dispatch treats every
//! backend uniformly. SVE has no stable intrinsics, so no SVE kernels exist;
//! forcing `Backend::Sve` degrades to scalar through the fallback chain.

#![allow(clippy::missing_safety_doc)]

use core::arch::aarch64::*;

// ─────────────────────────────────────────────────────────────────────────────
// f32 reductions
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "neon")]
unsafe fn sqeuclidean_neon_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 4;
  let mut acc = vdupq_n_f32(0.0);
  for i in 0..chunks {
    let va = vld1q_f32(a.as_ptr().add(i * 4));
    let vb = vld1q_f32(b.as_ptr().add(i * 4));
    let d = vsubq_f32(va, vb);
    acc = vfmaq_f32(acc, d, d);
  }
  let mut sum = vaddvq_f32(acc);
  for i in chunks * 4..a.len() {
    let d = a[i] - b[i];
    sum += d * d;
  }
  sum
}

#[target_feature(enable = "neon")]
unsafe fn manhattan_neon_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 4;
  let mut acc = vdupq_n_f32(0.0);
  for i in 0..chunks {
    let va = vld1q_f32(a.as_ptr().add(i * 4));
    let vb = vld1q_f32(b.as_ptr().add(i * 4));
    acc = vaddq_f32(acc, vabdq_f32(va, vb));
  }
  let mut sum = vaddvq_f32(acc);
  for i in chunks * 4..a.len() {
    sum += (a[i] - b[i]).abs();
  }
  sum
}

#[target_feature(enable = "neon")]
unsafe fn dot_neon_impl(a: &[f32], b: &[f32]) -> f32 {
  let chunks = a.len() / 4;
  let mut acc = vdupq_n_f32(0.0);
  for i in 0..chunks {
    let va = vld1q_f32(a.as_ptr().add(i * 4));
    let vb = vld1q_f32(b.as_ptr().add(i * 4));
    acc = vfmaq_f32(acc, va, vb);
  }
  let mut sum = vaddvq_f32(acc);
  for i in chunks * 4..a.len() {
    sum += a[i] * b[i];
  }
  sum
}

#[target_feature(enable = "neon")]
unsafe fn cosine_neon_impl(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  let chunks = a.len() / 4;
  let mut dot_acc = vdupq_n_f32(0.0);
  let mut na_acc = vdupq_n_f32(0.0);
  let mut nb_acc = vdupq_n_f32(0.0);
  for i in 0..chunks {
    let va = vld1q_f32(a.as_ptr().add(i * 4));
    let vb = vld1q_f32(b.as_ptr().add(i * 4));
    dot_acc = vfmaq_f32(dot_acc, va, vb);
    na_acc = vfmaq_f32(na_acc, va, va);
    nb_acc = vfmaq_f32(nb_acc, vb, vb);
  }
  let mut dot = vaddvq_f32(dot_acc);
  let mut norm_a = vaddvq_f32(na_acc);
  let mut norm_b = vaddvq_f32(nb_acc);
  for i in chunks * 4..a.len() {
    dot += a[i] * b[i];
    norm_a += a[i] * a[i];
    norm_b += b[i] * b[i];
  }
  (dot, norm_a, norm_b)
}

#[target_feature(enable = "neon")]
unsafe fn norm_sq_neon_impl(v: &[f32]) -> f64 {
  // Widen each pair to f64 lanes; matches the scalar kernel's headroom.
  let chunks = v.len() / 4;
  let mut acc = vdupq_n_f64(0.0);
  for i in 0..chunks {
    let x = vld1q_f32(v.as_ptr().add(i * 4));
    let lo = vcvt_f64_f32(vget_low_f32(x));
    let hi = vcvt_high_f64_f32(x);
    acc = vfmaq_f64(acc, lo, lo);
    acc = vfmaq_f64(acc, hi, hi);
  }
  let mut sum = vaddvq_f64(acc);
  for &x in &v[chunks * 4..] {
    sum += f64::from(x) * f64::from(x);
  }
  sum
}

// ─────────────────────────────────────────────────────────────────────────────
// Integer kernels
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "neon")]
unsafe fn hamming_neon_impl(a: &[u8], b: &[u8]) -> u64 {
  let chunks = a.len() / 16;
  let mut acc = vdupq_n_u64(0);
  for i in 0..chunks {
    let va = vld1q_u8(a.as_ptr().add(i * 16));
    let vb = vld1q_u8(b.as_ptr().add(i * 16));
    let bits = vcntq_u8(veorq_u8(va, vb));
    acc = vaddq_u64(acc, vpaddlq_u32(vpaddlq_u16(vpaddlq_u8(bits))));
  }
  let mut total = vaddvq_u64(acc);
  for i in chunks * 16..a.len() {
    total += u64::from((a[i] ^ b[i]).count_ones());
  }
  total
}

#[target_feature(enable = "neon")]
unsafe fn jaccard_neon_impl(a: &[u16], b: &[u16]) -> (u64, u64, u64) {
  // vmull widens u16*u16 to exact u32 products; pairwise-add-accumulate
  // folds them into u64 lanes.
  let chunks = a.len() / 4;
  let mut dot_acc = vdupq_n_u64(0);
  let mut na_acc = vdupq_n_u64(0);
  let mut nb_acc = vdupq_n_u64(0);
  for i in 0..chunks {
    let va = vld1_u16(a.as_ptr().add(i * 4));
    let vb = vld1_u16(b.as_ptr().add(i * 4));
    dot_acc = vpadalq_u32(dot_acc, vmull_u16(va, vb));
    na_acc = vpadalq_u32(na_acc, vmull_u16(va, va));
    nb_acc = vpadalq_u32(nb_acc, vmull_u16(vb, vb));
  }
  let mut dot = vaddvq_u64(dot_acc);
  let mut norm_a = vaddvq_u64(na_acc);
  let mut norm_b = vaddvq_u64(nb_acc);
  for i in chunks * 4..a.len() {
    let x = u64::from(a[i]);
    let y = u64::from(b[i]);
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }
  (dot, norm_a, norm_b)
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn sqeuclidean_neon(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { sqeuclidean_neon_impl(a, b) }
}

pub(crate) fn manhattan_neon(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { manhattan_neon_impl(a, b) }
}

pub(crate) fn dot_neon(a: &[f32], b: &[f32]) -> f32 {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { dot_neon_impl(a, b) }
}

pub(crate) fn cosine_neon(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { cosine_neon_impl(a, b) }
}

pub(crate) fn norm_sq_neon(v: &[f32]) -> f64 {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { norm_sq_neon_impl(v) }
}

pub(crate) fn hamming_neon(a: &[u8], b: &[u8]) -> u64 {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { hamming_neon_impl(a, b) }
}

pub(crate) fn jaccard_neon(a: &[u16], b: &[u16]) -> (u64, u64, u64) {
  // SAFETY: dispatch verified NEON before selecting this kernel.
  unsafe { jaccard_neon_impl(a, b) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scalar;

  const LENGTHS: [usize; 9] = [0, 1, 3, 4, 5, 15, 16, 17, 130];

  fn close(x: f32, y: f32) {
    let tol = 1e-4 * x.abs().max(y.abs()).max(1.0);
    assert!((x - y).abs() <= tol, "{x} vs {y}");
  }

  #[test]
  fn neon_matches_scalar() {
    for len in LENGTHS {
      let a: Vec<f32> = (0..len).map(|i| (i as f32).sin() * 10.0).collect();
      let b: Vec<f32> = (0..len).map(|i| (i as f32).cos() * 10.0).collect();
      close(sqeuclidean_neon(&a, &b), scalar::sqeuclidean(&a, &b));
      close(manhattan_neon(&a, &b), scalar::manhattan(&a, &b));
      close(dot_neon(&a, &b), scalar::dot(&a, &b));
      let (d0, na0, nb0) = cosine_neon(&a, &b);
      let (d1, na1, nb1) = scalar::cosine(&a, &b);
      close(d0, d1);
      close(na0, na1);
      close(nb0, nb1);
      let ns = norm_sq_neon(&a);
      assert!((ns - scalar::norm_sq(&a)).abs() <= 1e-6 * ns.abs().max(1.0));

      let bytes_a: Vec<u8> = (0..len).map(|i| (i * 37) as u8).collect();
      let bytes_b: Vec<u8> = (0..len).map(|i| (i * 101 + 5) as u8).collect();
      assert_eq!(hamming_neon(&bytes_a, &bytes_b), scalar::hamming(&bytes_a, &bytes_b));

      let words_a: Vec<u16> = (0..len).map(|i| (i * 7919) as u16).collect();
      let words_b: Vec<u16> = (0..len).map(|i| (i * 104729 + 13) as u16).collect();
      assert_eq!(jaccard_neon(&words_a, &words_b), scalar::jaccard(&words_a, &words_b));
    }
  }
}
