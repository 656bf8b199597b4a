//! Floating-point control-mode diagnostics.
//!
//! Reports whether flush-to-zero (FTZ) and denormals-are-zero (DAZ) are
//! currently enabled in the thread's floating-point control register.
//! Diagnostic only: the kernels in this workspace never change these modes
//! and produce the same statuses regardless of them.

/// FTZ/DAZ status snapshot.
///
/// `None` means the mode could not be determined on this platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FpStatus {
  /// Flush-to-zero: subnormal results are flushed to zero.
  pub ftz: Option<bool>,
  /// Denormals-are-zero: subnormal inputs are treated as zero.
  pub daz: Option<bool>,
}

/// Read the current thread's FTZ/DAZ status.
///
/// - x86_64: bits 15 (FTZ) and 6 (DAZ) of MXCSR.
/// - aarch64: bit 24 (FZ) of FPCR; AArch64 has a single flush bit, so it is
///   reported for both fields.
/// - elsewhere: both fields are `None`.
#[must_use]
pub fn status() -> FpStatus {
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  {
    const MXCSR_FTZ_BIT: u32 = 1 << 15;
    const MXCSR_DAZ_BIT: u32 = 1 << 6;

    let mut mxcsr: u32 = 0;
    // SAFETY: STMXCSR stores MXCSR to the given 4-byte location; SSE is
    // baseline on x86_64.
    unsafe {
      core::arch::asm!("stmxcsr [{0}]", in(reg) &mut mxcsr, options(nostack, preserves_flags));
    }
    FpStatus {
      ftz: Some(mxcsr & MXCSR_FTZ_BIT != 0),
      daz: Some(mxcsr & MXCSR_DAZ_BIT != 0),
    }
  }

  #[cfg(all(target_arch = "aarch64", not(miri)))]
  {
    const FPCR_FZ_BIT: u64 = 1 << 24;

    let fpcr: u64;
    // SAFETY: MRS from FPCR is an unprivileged read-only access.
    unsafe {
      core::arch::asm!("mrs {}, fpcr", out(reg) fpcr, options(nomem, nostack, preserves_flags));
    }
    let fz = fpcr & FPCR_FZ_BIT != 0;
    FpStatus {
      ftz: Some(fz),
      daz: Some(fz),
    }
  }

  #[cfg(not(all(any(target_arch = "x86_64", target_arch = "aarch64"), not(miri))))]
  {
    FpStatus::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_is_stable() {
    // The register is thread-local and nothing in this process toggles it.
    assert_eq!(status(), status());
  }

  #[test]
  #[cfg(all(any(target_arch = "x86_64", target_arch = "aarch64"), not(miri)))]
  fn native_targets_report_modes() {
    let s = status();
    assert!(s.ftz.is_some());
    assert!(s.daz.is_some());
  }
}
