//! Error type for the public API.

use thiserror::Error;

/// Errors reported by the metric operations.
///
/// The library never panics on bad input; every failure mode is a variant
/// here. Kernels themselves are infallible reductions; validation happens
/// once in the public entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
  /// The two input slices have different lengths.
  #[error("input lengths differ: left {left}, right {right}")]
  LengthMismatch {
    /// Length of the first slice.
    left: usize,
    /// Length of the second slice.
    right: usize,
  },

  /// A reduced sum came out NaN or infinite.
  ///
  /// A NaN/Inf anywhere in the input poisons the reduction, so this covers
  /// both invalid elements and accumulation overflow.
  #[error("non-finite value in reduction")]
  NonFinite,

  /// The squared norm overflowed to infinity during normalization.
  #[error("squared norm overflowed")]
  NormOverflow,
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;
