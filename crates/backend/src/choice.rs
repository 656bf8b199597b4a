//! Process-wide backend choice.
//!
//! One `AtomicU8` holds the currently requested [`Backend`] for the whole
//! process. `Auto` (the default) lets each operation pick the best candidate
//! its hardware supports; any other value asks every operation to walk that
//! backend's fallback chain instead.
//!
//! Setting the choice always succeeds, even for backends the hardware lacks:
//! validation happens at selection time, where an unsatisfiable request
//! degrades along the chain rather than erroring. Kernel cells observe the
//! change on their next call and re-resolve.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::family::Backend;

static CHOICE: AtomicU8 = AtomicU8::new(Backend::Auto as u8);

/// Set the process-wide backend choice.
///
/// Takes effect on the next call through every kernel cell. Thread-safe;
/// concurrent calls race benignly (last writer wins).
#[inline]
pub fn set_backend(backend: Backend) {
  CHOICE.store(backend.as_u8(), Ordering::Release);
}

/// Read the current process-wide backend choice.
#[inline]
#[must_use]
pub fn backend_choice() -> Backend {
  // The cell only ever holds values stored through set_backend.
  Backend::from_u8(CHOICE.load(Ordering::Acquire)).unwrap_or(Backend::Auto)
}
