//! CPU detection and capability reporting for simdist.
//!
//! This crate is the single source of truth for CPU feature detection across
//! the workspace. It answers "what vector instructions can run on this
//! machine?" exactly once per process and caches the answer.
//!
//! # Main entry point
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::AVX2_FMA_READY) {
//!     // Use the AVX2+FMA kernel
//! }
//! ```
//!
//! # Design
//!
//! 1. **One API**: kernels query [`caps()`] instead of doing ad-hoc detection.
//! 2. **Idempotent**: detection is cached; concurrent first probes converge
//!    on identical values behind an acquire/release-fenced guard.
//! 3. **Infallible**: an unrecognized platform reports no extensions, which
//!    degrades dispatch to scalar rather than erroring.
//! 4. **Injectable**: [`set_caps_override`] swaps the probing strategy for
//!    tests and bare-metal deployments.

// Fallibility discipline: deny unwrap/expect in production, allow in tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;
pub mod fp;

pub use caps::Caps;
pub use fp::FpStatus;

/// Get detected CPU capabilities.
///
/// Cached after the first call; subsequent calls cost one atomic load.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::get()
}

/// Detect capabilities without consulting the cache or override.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  detect::detect_uncached()
}

/// Set or clear the capabilities override.
///
/// When set, [`caps()`] returns the override instead of detecting. Useful
/// for forcing the scalar path in tests or pinning capabilities on bare
/// metal.
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check whether a capabilities override is active.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
