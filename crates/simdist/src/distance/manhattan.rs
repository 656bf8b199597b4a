//! Manhattan (L1) distance.
//!
//! No AVX2 candidate: absolute difference gains nothing from FMA, so the
//! 256-bit AVX kernel covers that hardware.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, ReduceF32Fn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<ReduceF32Fn>; 3] = [
  Candidate::new(
    "x86_64/avx512f",
    Backend::Avx512f,
    platform::caps::x86::AVX512F,
    crate::simd::x86_64::manhattan_avx512,
  ),
  Candidate::new(
    "x86_64/avx",
    Backend::Avx,
    platform::caps::x86::AVX,
    crate::simd::x86_64::manhattan_avx,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::manhattan),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<ReduceF32Fn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::manhattan_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::manhattan),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<ReduceF32Fn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::manhattan)];

static CELL: KernelCell<ReduceF32Fn> = KernelCell::new("dist_manhattan_f32");

/// Manhattan distance between two vectors.
///
/// Zero-length inputs return 0. Errors on mismatched lengths or a
/// non-finite reduced sum.
pub fn dist_manhattan_f32(a: &[f32], b: &[f32]) -> Result<f32> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(0.0);
  }
  kernel::finite_or((CELL.get(&CANDIDATES).func)(a, b))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[test]
  fn known_vector() {
    let a: Vec<f32> = (1..=9).map(|i| i as f32).collect();
    let b: Vec<f32> = (1..=9).rev().map(|i| i as f32).collect();
    assert_eq!(dist_manhattan_f32(&a, &b), Ok(40.0));
  }

  #[test]
  fn empty_is_zero() {
    assert_eq!(dist_manhattan_f32(&[], &[]), Ok(0.0));
  }

  #[test]
  fn non_finite_input_is_rejected() {
    let a = [1.0f32, f32::NAN, 3.0];
    assert_eq!(dist_manhattan_f32(&a, &[0.0; 3]), Err(Error::NonFinite));
  }
}
