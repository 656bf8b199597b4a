//! Runtime CPU detection.
//!
//! This module provides the cached `get()` entry point behind the crate's
//! public API. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (CPUID+XGETBV on x86_64, OS hwcaps on aarch64,
//!   both via the std feature-detection macros)
//! - Caching (`OnceLock` with `std`, an atomic state machine without)
//! - User-supplied overrides for bare metal and testing
//! - Miri fallback (always scalar-only)
//!
//! Detection cannot fail: an unrecognized platform yields [`Caps::NONE`],
//! which is a capability ceiling rather than an error.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────
//
// Concurrent first-time probes may both run the detection logic; they compute
// identical values, and the state machine's release store ensures any thread
// that observes READY also observes the final bits.

#[cfg(not(feature = "std"))]
mod cache {
  use core::sync::atomic::AtomicU8;

  use super::*;

  /// 0 = uninitialized, 1 = initializing, 2 = ready.
  static STATE: AtomicU8 = AtomicU8::new(0);
  static CACHED_BITS: AtomicU64 = AtomicU64::new(0);

  #[inline]
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    if STATE.load(Ordering::Acquire) == 2 {
      return Caps(CACHED_BITS.load(Ordering::Acquire));
    }

    match STATE.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let caps = f();
        CACHED_BITS.store(caps.0, Ordering::Release);
        STATE.store(2, Ordering::Release);
        caps
      }
      Err(_) => {
        while STATE.load(Ordering::Acquire) != 2 {
          core::hint::spin_loop();
        }
        Caps(CACHED_BITS.load(Ordering::Acquire))
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_BITS: AtomicU64 = AtomicU64::new(0);

/// Set or clear the capabilities override.
///
/// When set, [`get()`] returns the override value instead of detecting.
/// Pass `None` to clear the override and resume detection. Thread-safe;
/// typically called early in program initialization or around a test.
pub fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(caps) => {
      OVERRIDE_BITS.store(caps.0, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

#[inline]
fn get_override() -> Option<Caps> {
  if OVERRIDE_SET.load(Ordering::Acquire) {
    Some(Caps(OVERRIDE_BITS.load(Ordering::Acquire)))
  } else {
    None
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Get detected CPU capabilities.
///
/// Detection runs at most logically once per process and the result is
/// cached; subsequent calls are a single atomic load (plus the override
/// check). Under Miri, always returns [`Caps::NONE`] to avoid interpreting
/// SIMD intrinsics.
#[inline]
#[must_use]
pub fn get() -> Caps {
  #[cfg(miri)]
  {
    return Caps::NONE;
  }

  #[cfg(not(miri))]
  {
    if let Some(caps) = get_override() {
      return caps;
    }

    #[cfg(feature = "std")]
    {
      static CACHED: std::sync::OnceLock<Caps> = std::sync::OnceLock::new();
      *CACHED.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      cache::get_or_init(detect_uncached)
    }
  }
}

/// Detect capabilities without caching.
///
/// Useful for tests that want fresh detection.
#[must_use]
pub fn detect_uncached() -> Caps {
  #[cfg(target_arch = "x86_64")]
  {
    detect_x86_64()
  }

  #[cfg(target_arch = "aarch64")]
  {
    detect_aarch64()
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Caps::NONE
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
fn detect_x86_64() -> Caps {
  let mut caps = compile_time_x86_64();

  #[cfg(feature = "std")]
  {
    caps = caps.union(runtime_x86_64());
  }

  caps
}

#[cfg(target_arch = "x86_64")]
const fn compile_time_x86_64() -> Caps {
  use crate::caps::x86;

  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(target_feature = "avx")]
  {
    caps = caps.union(x86::AVX);
  }

  #[cfg(target_feature = "avx2")]
  {
    caps = caps.union(x86::AVX2);
  }

  #[cfg(target_feature = "fma")]
  {
    caps = caps.union(x86::FMA);
  }

  #[cfg(target_feature = "avx512f")]
  {
    caps = caps.union(x86::AVX512F);
  }

  #[cfg(target_feature = "avx512bw")]
  {
    caps = caps.union(x86::AVX512BW);
  }

  #[cfg(target_feature = "avx512dq")]
  {
    caps = caps.union(x86::AVX512DQ);
  }

  #[cfg(target_feature = "avx512vpopcntdq")]
  {
    caps = caps.union(x86::AVX512VPOPCNTDQ);
  }

  caps
}

/// Runtime-detected x86_64 features.
///
/// `is_x86_feature_detected!` checks both CPUID feature flags and, for the
/// AVX families, the XGETBV-reported OS extended-state support, so a kernel
/// that disabled AVX state saving is correctly reported as lacking AVX.
#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime_x86_64() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;

  if std::arch::is_x86_feature_detected!("avx") {
    caps = caps.union(x86::AVX);
  }
  if std::arch::is_x86_feature_detected!("avx2") {
    caps = caps.union(x86::AVX2);
  }
  if std::arch::is_x86_feature_detected!("fma") {
    caps = caps.union(x86::FMA);
  }
  if std::arch::is_x86_feature_detected!("avx512f") {
    caps = caps.union(x86::AVX512F);
  }
  if std::arch::is_x86_feature_detected!("avx512bw") {
    caps = caps.union(x86::AVX512BW);
  }
  if std::arch::is_x86_feature_detected!("avx512dq") {
    caps = caps.union(x86::AVX512DQ);
  }
  if std::arch::is_x86_feature_detected!("avx512vpopcntdq") {
    caps = caps.union(x86::AVX512VPOPCNTDQ);
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
fn detect_aarch64() -> Caps {
  use crate::caps::aarch64;

  // NEON is architecturally guaranteed on AArch64.
  #[allow(unused_mut)]
  let mut caps = aarch64::NEON;

  #[cfg(target_feature = "sve")]
  {
    caps = caps.union(aarch64::SVE);
  }

  // `is_aarch64_feature_detected!` reads the kernel's hwcap auxiliary vector
  // (or sysctl on Apple platforms).
  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("sve") {
      caps = caps.union(aarch64::SVE);
    }
  }

  caps
}
