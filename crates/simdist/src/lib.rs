//! Runtime-dispatched SIMD distance and similarity kernels.
//!
//! simdist computes vector distance and similarity metrics (squared
//! Euclidean, Manhattan, Hamming, dot, cosine, Jaccard/Tanimoto) plus
//! in-place L2 normalization, picking the fastest kernel the running CPU
//! supports at runtime:
//!
//! ```ignore
//! let a = [1.0f32, 2.0, 3.0];
//! let b = [4.0f32, 5.0, 6.0];
//! assert_eq!(simdist::sim_dot_f32(&a, &b)?, 32.0);
//! ```
//!
//! # Dispatch
//!
//! Capability detection (`platform`) runs once per process; each operation
//! keeps a lock-free kernel cell (`backend`) that memoizes selection, so the
//! hot path is two atomic loads and an indirect call. [`set_backend`] forces
//! a specific implementation family process-wide; unsupported or
//! unregistered requests degrade along a documented fallback chain and never
//! fail. [`diag`] reports what actually runs.
//!
//! # Numeric contract
//!
//! Every ISA variant of an operation computes the same raw reduction and
//! shares one finishing/validation step, so results differ only by
//! floating-point association order. Floating reductions reject NaN/Inf by
//! validating the reduced sum; Hamming and the Jaccard sums are exact
//! integers.
//!
//! # C ABI
//!
//! The `ffi` feature (default) exports `simdist_`-prefixed pointer-and-
//! status entry points mirroring the safe API.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod diag;
mod distance;
mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
mod kernel;
mod norm;
mod scalar;
mod simd;
mod similarity;

pub use backend::{backend_choice, set_backend, Backend};
pub use distance::{dist_hamming_u8, dist_manhattan_f32, dist_sqeuclidean_f32};
pub use error::{Error, Result};
pub use norm::normalize_l2_f32;
pub use similarity::{sim_cosine_f32, sim_dot_f32, sim_jaccard_u16};
