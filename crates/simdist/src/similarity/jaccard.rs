//! Jaccard/Tanimoto similarity over u16 count vectors.
//!
//! The raw sums are exact integers; only the final quotient rounds. The
//! integer kernels have no AVX or AVX-512 variant, so forcing either goes
//! to scalar.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, JaccardFn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<JaccardFn>; 2] = [
  Candidate::new(
    "x86_64/avx2",
    Backend::Avx2,
    platform::caps::x86::AVX2,
    crate::simd::x86_64::jaccard_avx2,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::jaccard),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<JaccardFn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::jaccard_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::jaccard),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<JaccardFn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::jaccard)];

static CELL: KernelCell<JaccardFn> = KernelCell::new("sim_jaccard_u16");

/// Jaccard/Tanimoto similarity of two count vectors, in `[0, 1]`.
///
/// Zero-length inputs and two all-zero vectors return 1 (identical).
/// Errors only on mismatched lengths.
pub fn sim_jaccard_u16(a: &[u16], b: &[u16]) -> Result<f32> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(1.0);
  }
  let (dot, norm_a, norm_b) = (CELL.get(&CANDIDATES).func)(a, b);
  Ok(kernel::jaccard_finish(dot, norm_a, norm_b))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_is_one() {
    let v: Vec<u16> = (0..50).map(|i| i * 3).collect();
    assert_eq!(sim_jaccard_u16(&v, &v), Ok(1.0));
  }

  #[test]
  fn empty_and_zero_are_one() {
    assert_eq!(sim_jaccard_u16(&[], &[]), Ok(1.0));
    assert_eq!(sim_jaccard_u16(&[0; 8], &[0; 8]), Ok(1.0));
  }

  #[test]
  fn disjoint_is_zero() {
    let a = [1u16, 0, 2, 0];
    let b = [0u16, 3, 0, 4];
    assert_eq!(sim_jaccard_u16(&a, &b), Ok(0.0));
  }

  #[test]
  fn partial_overlap_in_range() {
    let a = [1u16, 2, 3, 4];
    let b = [1u16, 2, 0, 0];
    let sim = sim_jaccard_u16(&a, &b).unwrap();
    assert!(sim > 0.0 && sim < 1.0);
  }
}
