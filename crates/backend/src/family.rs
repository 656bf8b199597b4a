//! Backend identification.
//!
//! A [`Backend`] names one implementation family across all operations in the
//! library. The same enum is used for forcing, diagnostics, and the recorded
//! tag inside each kernel cell, so "which code path ran?" always has a single
//! vocabulary.
//!
//! # Design
//!
//! Backends are operation-agnostic: forcing `Avx2` applies to every operation
//! that registered an AVX2 candidate, and operations without one fall through
//! their [`fallback_chain`](Backend::fallback_chain) to scalar. Variants carry
//! stable `u8` discriminants so the current choice can live in an `AtomicU8`
//! and cross an FFI boundary unchanged.

use platform::{caps::aarch64, caps::x86, Caps};

/// Implementation family for kernel selection.
///
/// Ordered roughly from "no preference" through x86 families to aarch64
/// families. The discriminants are part of the FFI contract; do not renumber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Backend {
  /// Automatic selection based on detected capabilities (default).
  #[default]
  Auto = 0,

  /// Portable scalar implementation. Always available.
  Scalar = 1,

  // ─── x86_64 ──────────────────────────────────────────────────────────────
  /// 256-bit AVX without the integer extensions.
  Avx = 2,

  /// AVX2 integer lanes; f32 kernels additionally use FMA.
  Avx2 = 3,

  /// AVX-512 foundation (512-bit f32/f64/i32/i64 lanes).
  Avx512f = 4,

  /// AVX-512 byte/word extension.
  Avx512bw = 5,

  /// AVX-512 doubleword/quadword extension.
  Avx512dq = 6,

  /// AVX-512 vector popcount. Used by Hamming-style kernels.
  Avx512vpopcntdq = 7,

  // ─── aarch64 ─────────────────────────────────────────────────────────────
  /// 128-bit NEON. Architecturally guaranteed on AArch64.
  Neon = 8,

  /// Scalable Vector Extension. Recognized and forceable, but stable Rust
  /// has no SVE intrinsics, so no operation currently registers SVE kernels;
  /// forcing it lands on scalar.
  Sve = 9,
}

impl Backend {
  /// All concrete (non-`Auto`) backends, in discriminant order.
  pub const ALL: [Self; 9] = [
    Self::Scalar,
    Self::Avx,
    Self::Avx2,
    Self::Avx512f,
    Self::Avx512bw,
    Self::Avx512dq,
    Self::Avx512vpopcntdq,
    Self::Neon,
    Self::Sve,
  ];

  /// Human-readable backend name.
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Scalar => "scalar",
      Self::Avx => "avx",
      Self::Avx2 => "avx2",
      Self::Avx512f => "avx512f",
      Self::Avx512bw => "avx512bw",
      Self::Avx512dq => "avx512dq",
      Self::Avx512vpopcntdq => "avx512vpopcntdq",
      Self::Neon => "neon",
      Self::Sve => "sve",
    }
  }

  /// Parse from string (for env var and CLI support).
  ///
  /// Case-insensitive; surrounding whitespace is ignored.
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    let s = s.trim();
    let all = [
      Self::Auto,
      Self::Scalar,
      Self::Avx,
      Self::Avx2,
      Self::Avx512f,
      Self::Avx512bw,
      Self::Avx512dq,
      Self::Avx512vpopcntdq,
      Self::Neon,
      Self::Sve,
    ];
    all.into_iter().find(|b| s.eq_ignore_ascii_case(b.as_str()))
  }

  /// The stable discriminant.
  #[inline]
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// Reconstruct from a stable discriminant.
  ///
  /// Returns `None` for values outside the defined range, which keeps
  /// the FFI entry points total.
  #[inline]
  #[must_use]
  pub const fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Auto),
      1 => Some(Self::Scalar),
      2 => Some(Self::Avx),
      3 => Some(Self::Avx2),
      4 => Some(Self::Avx512f),
      5 => Some(Self::Avx512bw),
      6 => Some(Self::Avx512dq),
      7 => Some(Self::Avx512vpopcntdq),
      8 => Some(Self::Neon),
      9 => Some(Self::Sve),
      _ => None,
    }
  }

  /// Capabilities required before any kernel tagged with this backend may
  /// run.
  ///
  /// `Auto` and `Scalar` require nothing. Note that individual candidates
  /// may require more than their tag's baseline (the AVX2 f32 kernels also
  /// need FMA); this is the floor, the candidate's own mask is the truth.
  #[inline]
  #[must_use]
  pub const fn required_caps(self) -> Caps {
    match self {
      Self::Auto | Self::Scalar => Caps::NONE,
      Self::Avx => x86::AVX,
      Self::Avx2 => x86::AVX2,
      Self::Avx512f => x86::AVX512F,
      Self::Avx512bw => x86::AVX512BW_READY,
      Self::Avx512dq => x86::AVX512DQ,
      Self::Avx512vpopcntdq => x86::AVX512VPOPCNTDQ_READY,
      Self::Neon => aarch64::NEON,
      Self::Sve => aarch64::SVE,
    }
  }

  /// Check availability against detected capabilities.
  #[inline]
  #[must_use]
  pub fn is_available(self, caps: Caps) -> bool {
    caps.has(self.required_caps())
  }

  /// Degradation order when this backend is forced but the operation has no
  /// kernel registered under it (or the hardware lacks it).
  ///
  /// AVX2 degrades through AVX before scalar; every other family goes
  /// straight to scalar. The chain always ends in `Scalar`.
  #[inline]
  #[must_use]
  pub const fn fallback_chain(self) -> &'static [Self] {
    match self {
      Self::Auto => &[Self::Auto],
      Self::Scalar => &[Self::Scalar],
      Self::Avx2 => &[Self::Avx2, Self::Avx, Self::Scalar],
      Self::Avx => &[Self::Avx, Self::Scalar],
      Self::Avx512f => &[Self::Avx512f, Self::Scalar],
      Self::Avx512bw => &[Self::Avx512bw, Self::Scalar],
      Self::Avx512dq => &[Self::Avx512dq, Self::Scalar],
      Self::Avx512vpopcntdq => &[Self::Avx512vpopcntdq, Self::Scalar],
      Self::Neon => &[Self::Neon, Self::Scalar],
      Self::Sve => &[Self::Sve, Self::Scalar],
    }
  }
}
