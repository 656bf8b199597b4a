//! Squared Euclidean distance.

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
    crate::simd::x86_64::sqeuclidean_avx512,
  ),
  Candidate::new(
    "x86_64/avx2-fma",
    Backend::Avx2,
    platform::caps::x86::AVX2_FMA_READY,
    crate::simd::x86_64::sqeuclidean_avx2,
  ),
  Candidate::new(
    "x86_64/avx",
    Backend::Avx,
    platform::caps::x86::AVX,
    crate::simd::x86_64::sqeuclidean_avx,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::sqeuclidean),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<ReduceF32Fn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::sqeuclidean_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::sqeuclidean),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<ReduceF32Fn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::sqeuclidean)];

static CELL: KernelCell<ReduceF32Fn> = KernelCell::new("dist_sqeuclidean_f32");

/// Squared Euclidean distance between two vectors.
///
/// Zero-length inputs return 0. Errors on mismatched lengths or when the
/// reduced sum comes out non-finite (NaN/Inf input or overflow).
pub fn dist_sqeuclidean_f32(a: &[f32], b: &[f32]) -> Result<f32> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(0.0);
  }
  kernel::finite_or((CELL.get(&CANDIDATES).func)(a, b))
}
