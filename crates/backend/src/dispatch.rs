//! Lock-free memoized kernel dispatch.
//!
//! A [`KernelCell`] sits in front of one operation's candidate list and
//! caches the outcome of [`select`](crate::select::select). The hot path is
//! two atomic loads and an indirect call; the selector only runs on the
//! first call and whenever the process-wide backend choice changes.
//!
//! # Protocol
//!
//! The cell is one atomic word packing the backend-choice discriminant the
//! cached candidate was resolved under together with the candidate's index
//! in the operation's `'static` list (offset by one; zero means unresolved).
//! Each call:
//!
//! 1. Load the current choice and the packed word.
//! 2. If the word is resolved and its recorded choice matches, call the
//!    indexed candidate.
//! 3. Otherwise run the selector and publish index and choice as one store.
//!
//! Because the pair is published as a single word, racing resolutions under
//! different choices interleave as whole words and a stale (choice, kernel)
//! pairing can never become the stable state. Last writer wins; a call that
//! raced a choice change may run one kernel resolved under the previous
//! choice, and the next call under the new choice re-resolves.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{choice::backend_choice, family::Backend, select::select_index, select::Candidate};

/// Low byte of the packed word: candidate index + 1.
const SLOT_MASK: usize = 0xff;

/// A memoizing dispatch point for one operation.
///
/// Declare one `static` cell per operation and pass the operation's
/// candidate list to [`get`](Self::get) on every call:
///
/// ```ignore
/// static CELL: KernelCell<DotFn> = KernelCell::new("sim_dot_f32");
///
/// fn dot(a: &[f32], b: &[f32]) -> Result<f32, Error> {
///     (CELL.get(&CANDIDATES).func)(a, b)
/// }
/// ```
pub struct KernelCell<F: Copy + 'static> {
  /// Operation name for selection logging and diagnostics.
  op: &'static str,
  /// `(choice discriminant << 8) | (candidate index + 1)`; zero until the
  /// first resolution.
  state: AtomicUsize,
  _kernel: core::marker::PhantomData<fn() -> F>,
}

impl<F: Copy + 'static> KernelCell<F> {
  /// Create an unresolved cell.
  #[must_use]
  pub const fn new(op: &'static str) -> Self {
    Self {
      op,
      state: AtomicUsize::new(0),
      _kernel: core::marker::PhantomData,
    }
  }

  /// Get the kernel to run, resolving and caching on first use and after
  /// backend-choice changes.
  ///
  /// `candidates` must be the same list on every call for a given cell and
  /// must end in a scalar candidate with empty requirements.
  #[inline]
  pub fn get(&self, candidates: &'static [Candidate<F>]) -> &'static Candidate<F> {
    let choice = backend_choice();
    let state = self.state.load(Ordering::Acquire);
    let slot = state & SLOT_MASK;

    if slot != 0 && state >> 8 == choice.as_u8() as usize {
      return &candidates[slot - 1];
    }

    self.resolve(choice, candidates)
  }

  /// Name of the kernel the current choice resolves to.
  #[inline]
  #[must_use]
  pub fn kernel_name(&self, candidates: &'static [Candidate<F>]) -> &'static str {
    self.get(candidates).name
  }

  /// Backend tag of the kernel the current choice resolves to.
  #[inline]
  #[must_use]
  pub fn backend(&self, candidates: &'static [Candidate<F>]) -> Backend {
    self.get(candidates).backend
  }

  /// Reset to unresolved. The next call re-runs the selector.
  ///
  /// Only needed by tests that toggle capability overrides; choice changes
  /// are picked up without it.
  pub fn reset(&self) {
    self.state.store(0, Ordering::Release);
  }

  #[cold]
  fn resolve(&self, choice: Backend, candidates: &'static [Candidate<F>]) -> &'static Candidate<F> {
    // The slot byte caps the list length; real lists hold a handful.
    debug_assert!(candidates.len() <= SLOT_MASK);

    let index = select_index(platform::caps(), choice, self.op, candidates);
    let state = ((choice.as_u8() as usize) << 8) | (index + 1);
    self.state.store(state, Ordering::Release);

    &candidates[index]
  }
}
