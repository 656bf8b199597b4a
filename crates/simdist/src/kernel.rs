//! Shared kernel signatures, validation, and finishing math.
//!
//! Every ISA variant of an operation computes the same raw reduction; the
//! public entry points apply the validation and finishing steps defined here
//! exactly once, so semantics are identical no matter which kernel ran.
//!
//! # Validation policy
//!
//! Floating reductions are validated on the final reduced scalar(s) only.
//! IEEE addition propagates NaN and Inf, so a single bad element anywhere in
//! the input necessarily poisons the sum; checking the sum detects both
//! invalid elements and accumulation overflow with one rule and no
//! per-element cost.

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Kernel signatures
// ─────────────────────────────────────────────────────────────────────────────

/// f32 pairwise reduction (squared euclidean, manhattan, dot).
pub(crate) type ReduceF32Fn = fn(&[f32], &[f32]) -> f32;

/// Cosine raw sums: `(dot, norm_a_sq, norm_b_sq)`.
pub(crate) type CosineFn = fn(&[f32], &[f32]) -> (f32, f32, f32);

/// Hamming distance over bytes (exact popcount, no finishing step).
pub(crate) type HammingFn = fn(&[u8], &[u8]) -> u64;

/// Jaccard raw integer sums: `(dot, norm_a_sq, norm_b_sq)`.
pub(crate) type JaccardFn = fn(&[u16], &[u16]) -> (u64, u64, u64);

/// Squared-norm reduction for normalization, returned in f64.
pub(crate) type NormSqFn = fn(&[f32]) -> f64;

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Require equal slice lengths.
#[inline]
pub(crate) fn check_len<T>(a: &[T], b: &[T]) -> Result<()> {
  if a.len() == b.len() {
    Ok(())
  } else {
    Err(Error::LengthMismatch {
      left: a.len(),
      right: b.len(),
    })
  }
}

/// Pass a finite reduced sum through; reject NaN/Inf.
#[inline]
pub(crate) fn finite_or(sum: f32) -> Result<f32> {
  if sum.is_finite() {
    Ok(sum)
  } else {
    Err(Error::NonFinite)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Finishing math
// ─────────────────────────────────────────────────────────────────────────────

/// Finish cosine similarity from raw sums.
///
/// Norms at or below `f32::MIN_POSITIVE` are treated as zero: two zero
/// vectors are defined as identical (similarity 1), one zero vector as
/// orthogonal (similarity 0). The quotient is clamped to `[-1, 1]` so
/// rounding in the raw sums can never push the result out of range.
pub(crate) fn cosine_finish(dot: f32, norm_a_sq: f32, norm_b_sq: f32) -> Result<f32> {
  if !dot.is_finite() || !norm_a_sq.is_finite() || !norm_b_sq.is_finite() {
    return Err(Error::NonFinite);
  }

  let a_zero = norm_a_sq <= f32::MIN_POSITIVE;
  let b_zero = norm_b_sq <= f32::MIN_POSITIVE;
  if a_zero && b_zero {
    return Ok(1.0);
  }
  if a_zero || b_zero {
    return Ok(0.0);
  }

  let denom = norm_a_sq.sqrt() * norm_b_sq.sqrt();
  if denom < f32::MIN_POSITIVE {
    return Ok(0.0);
  }

  Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Finish Jaccard/Tanimoto similarity from raw integer sums.
///
/// Computed in f64; the integer sums are exact, so the only rounding is the
/// final quotient. Two all-zero vectors are defined as identical.
pub(crate) fn jaccard_finish(dot: u64, norm_a_sq: u64, norm_b_sq: u64) -> f32 {
  if norm_a_sq == 0 && norm_b_sq == 0 {
    return 1.0;
  }

  let dot = dot as f64;
  let denom = norm_a_sq as f64 + norm_b_sq as f64 - dot;
  if denom < 1e-9 {
    return 1.0;
  }

  (dot / denom).clamp(0.0, 1.0) as f32
}

/// Validate a squared norm and produce the scale factor for normalization.
///
/// Returns `Ok(None)` when the norm is at or below `f32::MIN_POSITIVE`,
/// meaning the vector should be left untouched.
pub(crate) fn norm_scale(norm_sq: f64) -> Result<Option<f32>> {
  if norm_sq.is_nan() {
    return Err(Error::NonFinite);
  }
  if norm_sq.is_infinite() {
    return Err(Error::NormOverflow);
  }

  let norm = norm_sq.sqrt();
  if norm <= f64::from(f32::MIN_POSITIVE) {
    return Ok(None);
  }

  Ok(Some((1.0 / norm) as f32))
}
