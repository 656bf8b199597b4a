//! CPU capability representation.
//!
//! This module answers the question: "which vector instruction sets can I
//! legally run on this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 64-bit bitset. Each bit corresponds to one ISA extension;
//! the bits are grouped by CPU family but the API is uniform across targets.
//!
//! # Bit layout
//!
//! - Bits 0-15: x86/x86_64 extensions
//! - Bits 16-23: aarch64 extensions
//! - Remaining bits reserved
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let c = platform::caps();
//! if c.has(x86::AVX2_FMA_READY) {
//!     // Use the AVX2+FMA kernel
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`; it can be freely shared across
/// threads and is immutable once detection has run.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set (scalar-only).
  pub const NONE: Self = Self(0);

  /// Create a capability set from raw bits.
  ///
  /// Primarily useful for tests that inject synthetic capability sets via
  /// [`set_caps_override`](crate::set_caps_override).
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Check if all features in `required` are present.
  ///
  /// This is the core dispatch check.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit as u64 % 64))
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, other: Self) -> Self {
    self.union(other)
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Caps({:#018x})", self.0)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86 / x86_64 features
// ─────────────────────────────────────────────────────────────────────────────

/// x86_64 extension bits.
pub mod x86 {
  use super::Caps;

  pub const AVX: Caps = Caps::bit(0);
  pub const AVX2: Caps = Caps::bit(1);
  pub const FMA: Caps = Caps::bit(2);
  pub const AVX512F: Caps = Caps::bit(3);
  pub const AVX512BW: Caps = Caps::bit(4);
  pub const AVX512DQ: Caps = Caps::bit(5);
  pub const AVX512VPOPCNTDQ: Caps = Caps::bit(6);

  /// AVX2 kernels in this workspace assume fused multiply-add.
  pub const AVX2_FMA_READY: Caps = Caps(AVX2.0 | FMA.0);

  /// Byte-wise AVX-512 kernels need both the foundation and BW.
  pub const AVX512BW_READY: Caps = Caps(AVX512F.0 | AVX512BW.0);

  /// Vector popcount kernels need the foundation plus VPOPCNTDQ.
  pub const AVX512VPOPCNTDQ_READY: Caps = Caps(AVX512F.0 | AVX512VPOPCNTDQ.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 features
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 extension bits.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(16);
  pub const SVE: Caps = Caps::bit(17);
}

/// Human-readable names of the set features, in bit order.
///
/// Diagnostic only; reserved bits are skipped.
pub fn feature_names(caps: Caps) -> impl Iterator<Item = &'static str> {
  const TABLE: &[(Caps, &str)] = &[
    (x86::AVX, "avx"),
    (x86::AVX2, "avx2"),
    (x86::FMA, "fma"),
    (x86::AVX512F, "avx512f"),
    (x86::AVX512BW, "avx512bw"),
    (x86::AVX512DQ, "avx512dq"),
    (x86::AVX512VPOPCNTDQ, "avx512vpopcntdq"),
    (aarch64::NEON, "neon"),
    (aarch64::SVE, "sve"),
  ];
  TABLE
    .iter()
    .filter(move |(bit, _)| caps.has(*bit))
    .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;

  #[test]
  fn none_is_empty() {
    assert!(Caps::NONE.is_empty());
    assert_eq!(Caps::NONE.count(), 0);
  }

  #[test]
  fn has_requires_all_bits() {
    let caps = x86::AVX2.union(x86::FMA);
    assert!(caps.has(x86::AVX2));
    assert!(caps.has(x86::AVX2_FMA_READY));
    assert!(!caps.has(x86::AVX512F));
    assert!(!x86::AVX2.has(x86::AVX2_FMA_READY));
  }

  #[test]
  fn empty_requirement_always_satisfied() {
    assert!(Caps::NONE.has(Caps::NONE));
    assert!(x86::AVX.has(Caps::NONE));
  }

  #[test]
  fn families_do_not_overlap() {
    let x = x86::AVX | x86::AVX2 | x86::FMA | x86::AVX512F | x86::AVX512BW | x86::AVX512DQ | x86::AVX512VPOPCNTDQ;
    let a = aarch64::NEON | aarch64::SVE;
    assert!(x.intersection(a).is_empty());
  }

  #[test]
  fn feature_names_match_bits() {
    let caps = x86::AVX2 | aarch64::NEON;
    let names: Vec<_> = feature_names(caps).collect();
    assert_eq!(names, ["avx2", "neon"]);
  }
}
