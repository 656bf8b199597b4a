//! Hamming distance over bytes.
//!
//! Exact integer popcount of the bytewise XOR; no floating validation
//! applies. The AVX-512 kernel needs VPOPCNTDQ on top of the foundation;
//! no plain-AVX candidate exists (AVX has no integer lanes), so forcing
//! `Avx2` on pre-AVX2 hardware goes straight to scalar.

use backend::{Backend, Candidate, KernelCell};
use platform::Caps;

use crate::error::Result;
use crate::kernel::{self, HammingFn};

#[cfg(target_arch = "x86_64")]
static CANDIDATES: [Candidate<HammingFn>; 3] = [
  Candidate::new(
    "x86_64/avx512-vpopcntdq",
    Backend::Avx512vpopcntdq,
    platform::caps::x86::AVX512VPOPCNTDQ_READY,
    crate::simd::x86_64::hamming_avx512,
  ),
  Candidate::new(
    "x86_64/avx2",
    Backend::Avx2,
    platform::caps::x86::AVX2,
    crate::simd::x86_64::hamming_avx2,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::hamming),
];

#[cfg(target_arch = "aarch64")]
static CANDIDATES: [Candidate<HammingFn>; 2] = [
  Candidate::new(
    "aarch64/neon",
    Backend::Neon,
    platform::caps::aarch64::NEON,
    crate::simd::aarch64::hamming_neon,
  ),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::hamming),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static CANDIDATES: [Candidate<HammingFn>; 1] =
  [Candidate::new("scalar", Backend::Scalar, Caps::NONE, crate::scalar::hamming)];

static CELL: KernelCell<HammingFn> = KernelCell::new("dist_hamming_u8");

/// Hamming distance: number of differing bits between two byte strings.
///
/// Zero-length inputs return 0. Errors only on mismatched lengths; the
/// count itself is exact and infallible.
pub fn dist_hamming_u8(a: &[u8], b: &[u8]) -> Result<u64> {
  kernel::check_len(a, b)?;
  if a.is_empty() {
    return Ok(0);
  }
  Ok((CELL.get(&CANDIDATES).func)(a, b))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[test]
  fn all_bits_differ() {
    assert_eq!(dist_hamming_u8(&[0u8; 4], &[0xFF; 4]), Ok(32));
  }

  #[test]
  fn identical_is_zero() {
    let v: Vec<u8> = (0..100).collect();
    assert_eq!(dist_hamming_u8(&v, &v), Ok(0));
  }

  #[test]
  fn empty_is_zero() {
    assert_eq!(dist_hamming_u8(&[], &[]), Ok(0));
  }

  #[test]
  fn length_mismatch() {
    assert_eq!(
      dist_hamming_u8(&[0], &[0, 0]),
      Err(Error::LengthMismatch { left: 1, right: 2 })
    );
  }
}
