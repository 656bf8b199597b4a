//! Kernel selection.
//!
//! [`select`] is the pure decision function at the heart of dispatch: given
//! detected capabilities, the requested backend, and an operation's ordered
//! candidate list, it returns the candidate that should run. It performs no
//! caching and no atomics; [`KernelCell`](crate::dispatch::KernelCell)
//! layers the memoization on top.
//!
//! # Selection rules
//!
//! - **Auto**: first candidate whose `requires` mask is satisfied. Lists are
//!   ordered best-first and must end in a scalar candidate with no
//!   requirements, so this always terminates.
//! - **Forced**: walk the forced backend's fallback chain; at each link, a
//!   candidate tagged with that backend is taken iff its `requires` mask is
//!   satisfied. Chain links with no registered candidate are skipped. The
//!   chain ends in `Scalar`, so this also always terminates.

use platform::Caps;

use crate::family::Backend;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with its backend tag and capability requirements.
///
/// Candidates are registered per operation, ordered from best to worst, and
/// must end with a `Backend::Scalar` entry requiring `Caps::NONE`.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F: 'static> {
  /// Human-readable name for diagnostics (e.g., "x86_64/avx2-fma").
  pub name: &'static str,
  /// Backend family this kernel belongs to, for forcing and introspection.
  pub backend: Backend,
  /// Capabilities that must all be present for this kernel to be sound.
  ///
  /// May exceed the backend's baseline (AVX2 f32 kernels also require FMA).
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, backend: Backend, requires: Caps, func: F) -> Self {
    Self {
      name,
      backend,
      requires,
      func,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Select the kernel to run for one operation.
///
/// `candidates` must be a `'static` best-first list ending in a scalar
/// candidate with empty requirements; the returned reference borrows from it,
/// which is what lets the caller publish the result in an `AtomicPtr`.
///
/// # Panics
///
/// Panics if the list has no runnable candidate. Registration always appends
/// a scalar fallback, so this is unreachable for well-formed lists.
#[must_use]
pub fn select<F: Copy>(
  caps: Caps,
  choice: Backend,
  op: &'static str,
  candidates: &'static [Candidate<F>],
) -> &'static Candidate<F> {
  &candidates[select_index(caps, choice, op, candidates)]
}

/// Index form of [`select`], for dispatch cells that cache the winning
/// candidate's position instead of its address.
pub(crate) fn select_index<F>(
  caps: Caps,
  choice: Backend,
  op: &'static str,
  candidates: &[Candidate<F>],
) -> usize {
  match choice {
    Backend::Auto => {
      for (index, candidate) in candidates.iter().enumerate() {
        if caps.has(candidate.requires) {
          log::debug!("{op}: selected {} (auto)", candidate.name);
          return index;
        }
      }
    }
    forced => {
      for &link in forced.fallback_chain() {
        for (index, candidate) in candidates.iter().enumerate() {
          if candidate.backend == link && caps.has(candidate.requires) {
            if candidate.backend != forced {
              log::debug!(
                "{op}: forced {} unavailable, degraded to {}",
                forced.as_str(),
                candidate.name
              );
            } else {
              log::debug!("{op}: selected {} (forced)", candidate.name);
            }
            return index;
          }
        }
      }
    }
  }

  // Well-formed lists end in a scalar candidate with empty requirements.
  panic!("no runnable kernel for {op}; candidate list must end in scalar");
}
