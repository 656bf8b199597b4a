//! Cosine similarity.
//!
//! Kernels return the raw `(dot, norm_a_sq, norm_b_sq)` sums in one pass;
//! the zero-vector conventions and clamping live in
//! [`kernel::cosine_finish`] so every backend agrees on edge cases.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, CosineFn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<CosineFn>; 4] = [
  Candidate::new(
    "x86_64/avx512f",
    Backend::Avx512f,
    platform::caps::x86::AVX512F,
    crate::simd::x86_64::cosine_avx512,
  ),
  Candidate::new(
    "x86_64/avx2-fma",
    Backend::Avx2,
    platform::caps::x86::AVX2_FMA_READY,
    crate::simd::x86_64::cosine_avx2,
  ),
  Candidate::new(
    "x86_64/avx",
    Backend::Avx,
    platform::caps::x86::AVX,
    crate::simd::x86_64::cosine_avx,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::cosine),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<CosineFn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::cosine_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::cosine),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<CosineFn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::cosine)];

static CELL: KernelCell<CosineFn> = KernelCell::new("sim_cosine_f32");

/// Cosine similarity of two vectors, clamped to `[-1, 1]`.
///
/// Zero-length inputs return 1 (vacuously identical). Two zero vectors are
/// defined as identical (1), one zero vector as orthogonal (0). Errors on
/// mismatched lengths or non-finite raw sums.
pub fn sim_cosine_f32(a: &[f32], b: &[f32]) -> Result<f32> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(1.0);
  }
  let (dot, norm_a, norm_b) = (CELL.get(&CANDIDATES).func)(a, b);
  kernel::cosine_finish(dot, norm_a, norm_b)
}
