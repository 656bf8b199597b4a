//! Backend selection and lock-free kernel dispatch for simdist.
//!
//! This crate turns the capability bits reported by `platform` into a
//! concrete kernel choice per operation:
//!
//! - [`Backend`]: names one implementation family (scalar, AVX2, NEON, ...)
//! - [`set_backend`] / [`backend_choice`]: the process-wide forcing knob
//! - [`Candidate`] + [`select`]: pure best-first selection over a
//!   per-operation candidate list
//! - [`KernelCell`]: lock-free memoization of the selection so the hot path
//!   is two atomic loads and an indirect call
//!
//! # Usage
//!
//! Operation crates register kernels as an ordered `'static` list and put a
//! cell in front of it:
//!
//! ```ignore
//! use backend::{Backend, Candidate, KernelCell};
//! use platform::{caps::x86, Caps};
//!
//! type DotFn = fn(&[f32], &[f32]) -> f32;
//!
//! static CANDIDATES: [Candidate<DotFn>; 2] = [
//!     Candidate::new("x86_64/avx2-fma", Backend::Avx2, x86::AVX2_FMA_READY, dot_avx2),
//!     Candidate::new("scalar", Backend::Scalar, Caps::NONE, dot_scalar),
//! ];
//! static CELL: KernelCell<DotFn> = KernelCell::new("sim_dot_f32");
//!
//! fn dot(a: &[f32], b: &[f32]) -> f32 {
//!     (CELL.get(&CANDIDATES).func)(a, b)
//! }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod choice;
pub mod dispatch;
pub mod family;
pub mod select;

pub use choice::{backend_choice, set_backend};
pub use dispatch::KernelCell;
pub use family::Backend;
pub use select::{select, Candidate};
