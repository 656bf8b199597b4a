//! In-place L2 normalization.
//!
//! The dispatched kernel computes the squared norm; the entry point
//! validates it before any element is written. Scaling a finite vector by
//! the finite reciprocal of its own norm cannot produce a non-finite
//! element, so a failed call never leaves the vector partially scaled.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, NormSqFn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<NormSqFn>; 3] = [
  Candidate::new(
    "x86_64/avx512f",
    Backend::Avx512f,
    platform::caps::x86::AVX512F,
    crate::simd::x86_64::norm_sq_avx512,
  ),
  Candidate::new(
    "x86_64/avx",
    Backend::Avx,
    platform::caps::x86::AVX,
    crate::simd::x86_64::norm_sq_avx,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::norm_sq),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<NormSqFn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::norm_sq_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::norm_sq),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<NormSqFn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::norm_sq)];

static CELL: KernelCell<NormSqFn> = KernelCell::new("normalize_l2_f32");

/// Scale a vector in place to unit L2 norm.
///
/// Zero-length and (near-)zero vectors are left untouched and succeed.
/// A NaN in the input yields [`Error::NonFinite`](crate::Error::NonFinite),
/// an overflowing squared norm yields
/// [`Error::NormOverflow`](crate::Error::NormOverflow); in both cases the
/// vector is unmodified.
pub fn normalize_l2_f32(v: &mut [f32]) -> Result<()> {
  if v.is_empty() {
    return Ok(());
  }

  let norm_sq = (CELL.get(&CANDIDATES).func)(v);
  let Some(scale) = kernel::norm_scale(norm_sq)? else {
    return Ok(());
  };

  for x in v.iter_mut() {
    *x *= scale;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
  }

  #[test]
  fn produces_unit_norm() {
    let mut v: Vec<f32> = (1..=37).map(|i| i as f32).collect();
    normalize_l2_f32(&mut v).unwrap();
    assert!((norm(&v) - 1.0).abs() < 1e-5);
  }

  #[test]
  fn zero_vector_is_untouched() {
    let mut v = [0.0f32; 8];
    normalize_l2_f32(&mut v).unwrap();
    assert_eq!(v, [0.0; 8]);
  }

  #[test]
  fn empty_is_noop() {
    normalize_l2_f32(&mut []).unwrap();
  }

  #[test]
  fn nan_leaves_vector_unmodified() {
    let mut v = [1.0f32, f32::NAN, 3.0];
    assert_eq!(normalize_l2_f32(&mut v), Err(Error::NonFinite));
    assert_eq!(v[0], 1.0);
    assert!(v[1].is_nan());
    assert_eq!(v[2], 3.0);
  }

  #[test]
  fn infinite_input_reports_overflow() {
    // Inf squares to Inf in the f64 sum.
    let mut v = [1.0f32, f32::INFINITY];
    assert_eq!(normalize_l2_f32(&mut v), Err(Error::NormOverflow));
    assert_eq!(v[0], 1.0);
  }

  #[test]
  fn large_values_survive_f64_accumulation() {
    // These squares overflow f32 but not f64.
    let mut v = [f32::MAX / 2.0; 4];
    normalize_l2_f32(&mut v).unwrap();
    assert!((norm(&v) - 1.0).abs() < 1e-5);
  }
}
