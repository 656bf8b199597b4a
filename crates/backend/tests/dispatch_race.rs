//! Racing a backend-choice change against dispatch resolution.
//!
//! The cell publishes its resolved kernel and the choice it was resolved
//! under as one atomic word, so however a race interleaves, once it
//! quiesces the served kernel must match the winning choice.

use std::sync::Barrier;
use std::thread;

use backend::{backend_choice, set_backend, Backend, Candidate, KernelCell};
use platform::Caps;

type DemoFn = fn() -> u32;

fn vector_kernel() -> u32 {
  2
}

fn scalar_kernel() -> u32 {
  1
}

// Both candidates are runnable on any hardware, so each forced choice
// resolves to its own tag and the outcomes are distinguishable.
static CANDIDATES: [Candidate<DemoFn>; 2] = [
  Candidate::new("vector", Backend::Neon, Caps::NONE, vector_kernel),
  Candidate::new("scalar", Backend::Scalar, Caps::NONE, scalar_kernel),
];

static CELL: KernelCell<DemoFn> = KernelCell::new("demo");

#[test]
fn quiescent_cell_matches_winning_choice() {
  for _ in 0..500 {
    CELL.reset();
    let barrier = Barrier::new(2);

    thread::scope(|scope| {
      scope.spawn(|| {
        barrier.wait();
        set_backend(Backend::Scalar);
        CELL.get(&CANDIDATES);
      });
      scope.spawn(|| {
        barrier.wait();
        set_backend(Backend::Neon);
        CELL.get(&CANDIDATES);
      });
    });

    // No matter how the stores interleaved, a quiescent call serves the
    // kernel selected for whichever choice won.
    let served = CELL.get(&CANDIDATES);
    assert_eq!(served.backend, backend_choice());
    assert_eq!(
      (served.func)(),
      if backend_choice() == Backend::Scalar { 1 } else { 2 }
    );
  }

  set_backend(Backend::Auto);
}
