//! C ABI.
//!
//! Pointer-shaped entry points with status codes for non-Rust callers.
//! The contract, per function taking `n` elements and an output pointer:
//!
//! - null output pointer: `NullPtr`, nothing computed.
//! - `n == 0`: the identity is written, `Success`; input pointers are never
//!   dereferenced, so null inputs are legal.
//! - `n > 0` with a null input pointer: `NullPtr`, and the failure sentinel
//!   is written (NaN for floats, `u64::MAX` for counts).
//! - computation errors map to a status and also write the sentinel, so a
//!   caller that ignores the status cannot mistake a failure for a result.

use core::ffi::c_char;

use backend::Backend;

use crate::error::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Status codes
// ─────────────────────────────────────────────────────────────────────────────

/// Status codes returned by every FFI entry point.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  /// Operation completed and the result was written.
  Success = 0,
  /// A required pointer was null.
  NullPtr = -1,
  /// Input values were invalid (non-finite data, overflow, bad backend id).
  InvalidInput = -3,
  /// The requested CPU feature is not available.
  ///
  /// Kept for ABI compatibility; selection degrades instead of failing, so
  /// current entry points never return it.
  CpuNotSupported = -4,
  /// Unspecified internal failure.
  Failure = -99,
}

impl From<Error> for Status {
  fn from(err: Error) -> Self {
    match err {
      Error::LengthMismatch { .. } | Error::NonFinite | Error::NormOverflow => Self::InvalidInput,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pairwise f32 reductions
// ─────────────────────────────────────────────────────────────────────────────

/// Shared wrapper for the `(a, b, n) -> f32` operations.
///
/// # Safety
///
/// Non-null `a`/`b` must point to `n` readable `f32`s; `out` must be
/// writable if non-null.
unsafe fn reduce_f32(
  a: *const f32,
  b: *const f32,
  n: usize,
  out: *mut f32,
  identity: f32,
  op: fn(&[f32], &[f32]) -> crate::Result<f32>,
) -> Status {
  if out.is_null() {
    return Status::NullPtr;
  }
  if n == 0 {
    out.write(identity);
    return Status::Success;
  }
  if a.is_null() || b.is_null() {
    out.write(f32::NAN);
    return Status::NullPtr;
  }

  let a = core::slice::from_raw_parts(a, n);
  let b = core::slice::from_raw_parts(b, n);
  match op(a, b) {
    Ok(value) => {
      out.write(value);
      Status::Success
    }
    Err(err) => {
      out.write(f32::NAN);
      err.into()
    }
  }
}

/// Squared Euclidean distance. See [`crate::dist_sqeuclidean_f32`].
///
/// # Safety
///
/// Non-null `a`/`b` must point to `n` readable `f32`s; `out` must be
/// writable if non-null.
#[no_mangle]
pub unsafe extern "C" fn simdist_dist_sqeuclidean_f32(
  a: *const f32,
  b: *const f32,
  n: usize,
  out: *mut f32,
) -> Status {
  reduce_f32(a, b, n, out, 0.0, crate::dist_sqeuclidean_f32)
}

/// Manhattan distance. See [`crate::dist_manhattan_f32`].
///
/// # Safety
///
/// As for [`simdist_dist_sqeuclidean_f32`].
#[no_mangle]
pub unsafe extern "C" fn simdist_dist_manhattan_f32(
  a: *const f32,
  b: *const f32,
  n: usize,
  out: *mut f32,
) -> Status {
  reduce_f32(a, b, n, out, 0.0, crate::dist_manhattan_f32)
}

/// Dot product. See [`crate::sim_dot_f32`].
///
/// # Safety
///
/// As for [`simdist_dist_sqeuclidean_f32`].
#[no_mangle]
pub unsafe extern "C" fn simdist_sim_dot_f32(a: *const f32, b: *const f32, n: usize, out: *mut f32) -> Status {
  reduce_f32(a, b, n, out, 0.0, crate::sim_dot_f32)
}

/// Cosine similarity. See [`crate::sim_cosine_f32`].
///
/// # Safety
///
/// As for [`simdist_dist_sqeuclidean_f32`].
#[no_mangle]
pub unsafe extern "C" fn simdist_sim_cosine_f32(a: *const f32, b: *const f32, n: usize, out: *mut f32) -> Status {
  reduce_f32(a, b, n, out, 1.0, crate::sim_cosine_f32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Integer operations
// ─────────────────────────────────────────────────────────────────────────────

/// Hamming distance over bytes. See [`crate::dist_hamming_u8`].
///
/// # Safety
///
/// Non-null `a`/`b` must point to `n` readable bytes; `out` must be
/// writable if non-null.
#[no_mangle]
pub unsafe extern "C" fn simdist_dist_hamming_u8(a: *const u8, b: *const u8, n: usize, out: *mut u64) -> Status {
  if out.is_null() {
    return Status::NullPtr;
  }
  if n == 0 {
    out.write(0);
    return Status::Success;
  }
  if a.is_null() || b.is_null() {
    out.write(u64::MAX);
    return Status::NullPtr;
  }

  let a = core::slice::from_raw_parts(a, n);
  let b = core::slice::from_raw_parts(b, n);
  match crate::dist_hamming_u8(a, b) {
    Ok(value) => {
      out.write(value);
      Status::Success
    }
    Err(err) => {
      out.write(u64::MAX);
      err.into()
    }
  }
}

/// Jaccard/Tanimoto similarity over u16 counts. See [`crate::sim_jaccard_u16`].
///
/// # Safety
///
/// Non-null `a`/`b` must point to `n` readable `u16`s; `out` must be
/// writable if non-null.
#[no_mangle]
pub unsafe extern "C" fn simdist_sim_jaccard_u16(a: *const u16, b: *const u16, n: usize, out: *mut f32) -> Status {
  if out.is_null() {
    return Status::NullPtr;
  }
  if n == 0 {
    out.write(1.0);
    return Status::Success;
  }
  if a.is_null() || b.is_null() {
    out.write(f32::NAN);
    return Status::NullPtr;
  }

  let a = core::slice::from_raw_parts(a, n);
  let b = core::slice::from_raw_parts(b, n);
  match crate::sim_jaccard_u16(a, b) {
    Ok(value) => {
      out.write(value);
      Status::Success
    }
    Err(err) => {
      out.write(f32::NAN);
      err.into()
    }
  }
}

/// In-place L2 normalization. See [`crate::normalize_l2_f32`].
///
/// # Safety
///
/// Non-null `v` must point to `n` readable and writable `f32`s.
#[no_mangle]
pub unsafe extern "C" fn simdist_normalize_l2_f32(v: *mut f32, n: usize) -> Status {
  if n == 0 {
    return Status::Success;
  }
  if v.is_null() {
    return Status::NullPtr;
  }

  let v = core::slice::from_raw_parts_mut(v, n);
  match crate::normalize_l2_f32(v) {
    Ok(()) => Status::Success,
    Err(err) => err.into(),
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend control
// ─────────────────────────────────────────────────────────────────────────────

/// Set the process-wide backend choice by discriminant.
///
/// Unknown discriminants yield `InvalidInput` and leave the choice
/// unchanged. Requesting an unsupported backend succeeds; selection
/// degrades along the fallback chain.
#[no_mangle]
pub extern "C" fn simdist_set_backend(backend: u8) -> Status {
  match Backend::from_u8(backend) {
    Some(backend) => {
      backend::set_backend(backend);
      Status::Success
    }
    None => Status::InvalidInput,
  }
}

/// Current process-wide backend choice, as its discriminant.
#[no_mangle]
pub extern "C" fn simdist_get_backend_choice() -> u8 {
  backend::backend_choice().as_u8()
}

/// Name of the backend the f32 reduction family currently resolves to, as a
/// NUL-terminated static string.
#[no_mangle]
pub extern "C" fn simdist_get_backend() -> *const c_char {
  let name: &'static str = match crate::diag::active_backend() {
    Backend::Auto => "auto\0",
    Backend::Scalar => "scalar\0",
    Backend::Avx => "avx\0",
    Backend::Avx2 => "avx2\0",
    Backend::Avx512f => "avx512f\0",
    Backend::Avx512bw => "avx512bw\0",
    Backend::Avx512dq => "avx512dq\0",
    Backend::Avx512vpopcntdq => "avx512vpopcntdq\0",
    Backend::Neon => "neon\0",
    Backend::Sve => "sve\0",
  };
  name.as_ptr().cast()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn null_out_pointer_is_rejected() {
    // SAFETY: all pointers are null or unused (n == 0 paths aside).
    unsafe {
      assert_eq!(
        simdist_sim_dot_f32(core::ptr::null(), core::ptr::null(), 0, core::ptr::null_mut()),
        Status::NullPtr
      );
    }
  }

  #[test]
  fn zero_length_never_dereferences_inputs() {
    let mut out = f32::NAN;
    // SAFETY: null inputs are legal for n == 0; out is a valid local.
    unsafe {
      assert_eq!(
        simdist_sim_cosine_f32(core::ptr::null(), core::ptr::null(), 0, &mut out),
        Status::Success
      );
    }
    assert_eq!(out, 1.0);
  }

  #[test]
  fn null_input_writes_sentinel() {
    let b = [1.0f32, 2.0];
    let mut out = 0.0f32;
    // SAFETY: b and out are valid; a is deliberately null with n > 0.
    unsafe {
      assert_eq!(
        simdist_dist_sqeuclidean_f32(core::ptr::null(), b.as_ptr(), 2, &mut out),
        Status::NullPtr
      );
    }
    assert!(out.is_nan());

    let mut count = 0u64;
    // SAFETY: as above for the byte variant.
    unsafe {
      assert_eq!(
        simdist_dist_hamming_u8(core::ptr::null(), core::ptr::null(), 2, &mut count),
        Status::NullPtr
      );
    }
    assert_eq!(count, u64::MAX);
  }

  #[test]
  fn invalid_input_maps_to_status_and_sentinel() {
    let a = [f32::NAN, 1.0];
    let b = [1.0f32, 2.0];
    let mut out = 0.0f32;
    // SAFETY: all pointers reference valid locals of length 2.
    unsafe {
      assert_eq!(
        simdist_dist_sqeuclidean_f32(a.as_ptr(), b.as_ptr(), 2, &mut out),
        Status::InvalidInput
      );
    }
    assert!(out.is_nan());
  }

  #[test]
  fn roundtrip_through_ffi_matches_safe_api() {
    let a = [1.0f32, 2.0, 3.0];
    let b = [4.0f32, 5.0, 6.0];
    let mut out = 0.0f32;
    // SAFETY: all pointers reference valid locals of length 3.
    unsafe {
      assert_eq!(simdist_sim_dot_f32(a.as_ptr(), b.as_ptr(), 3, &mut out), Status::Success);
    }
    assert_eq!(out, 32.0);
  }

  #[test]
  fn backend_control_roundtrip() {
    assert_eq!(simdist_set_backend(200), Status::InvalidInput);
    assert_eq!(simdist_set_backend(Backend::Auto.as_u8()), Status::Success);
    assert_eq!(simdist_get_backend_choice(), Backend::Auto.as_u8());
    assert!(!simdist_get_backend().is_null());
  }
}
