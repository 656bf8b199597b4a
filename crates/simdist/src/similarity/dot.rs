//! Dot product similarity.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, ReduceF32Fn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<ReduceF32Fn>; 4] = [
  Candidate::new(
    "x86_64/avx512f",
    Backend::Avx512f,
    platform::caps::x86::AVX512F,
    crate::simd::x86_64::dot_avx512,
  ),
  Candidate::new(
    "x86_64/avx2-fma",
    Backend::Avx2,
    platform::caps::x86::AVX2_FMA_READY,
    crate::simd::x86_64::dot_avx2,
  ),
  Candidate::new(
    "x86_64/avx",
    Backend::Avx,
    platform::caps::x86::AVX,
    crate::simd::x86_64::dot_avx,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::dot),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<ReduceF32Fn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::dot_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::dot),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<ReduceF32Fn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::dot)];

static CELL: KernelCell<ReduceF32Fn> = KernelCell::new("sim_dot_f32");

/// Dot product of two vectors.
///
/// Zero-length inputs return 0. Errors on mismatched lengths or a
/// non-finite reduced sum.
pub fn sim_dot_f32(a: &[f32], b: &[f32]) -> Result<f32> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(0.0);
  }
  kernel::finite_or((CELL.get(&CANDIDATES).func)(a, b))
}

/// Kernel name the f32 reduction family currently resolves to.
///
/// Diagnostic; the dot cell is representative because all f32 reductions
/// register the same backends.
pub(crate) fn kernel_name() -> &'static str {
  CELL.kernel_name(&CANDIDATES)
}

/// Backend tag the f32 reduction family currently resolves to.
pub(crate) fn active_backend() -> Backend {
  CELL.backend(&CANDIDATES)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[test]
  fn known_vector() {
    assert_eq!(sim_dot_f32(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), Ok(32.0));
  }

  #[test]
  fn empty_is_zero() {
    assert_eq!(sim_dot_f32(&[], &[]), Ok(0.0));
  }

  #[test]
  fn overflow_is_rejected() {
    // Finite inputs whose products overflow f32 poison the sum to Inf.
    let a = [f32::MAX; 4];
    assert_eq!(sim_dot_f32(&a, &a), Err(Error::NonFinite));
  }
}
