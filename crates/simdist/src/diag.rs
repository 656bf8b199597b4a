//! Observability accessors.
//!
//! Everything here is diagnostic only; none of it affects results.

use backend::Backend;
use platform::caps::{aarch64, x86};

pub use platform::FpStatus;

/// Kernel name the f32 reduction family resolves to under the current
/// backend choice (e.g. `"x86_64/avx2-fma"`, `"scalar"`).
#[must_use]
pub fn active_backend_name() -> &'static str {
  crate::similarity::dot::kernel_name()
}

/// Backend tag the f32 reduction family resolves to.
#[must_use]
pub fn active_backend() -> Backend {
  crate::similarity::dot::active_backend()
}

/// Current FTZ/DAZ floating-point mode readout.
#[must_use]
pub fn fp_status() -> FpStatus {
  platform::fp::status()
}

/// AVX available on this machine.
#[must_use]
pub fn has_avx() -> bool {
  platform::caps().has(x86::AVX)
}

/// AVX2 available on this machine.
#[must_use]
pub fn has_avx2() -> bool {
  platform::caps().has(x86::AVX2)
}

/// FMA available on this machine.
#[must_use]
pub fn has_fma() -> bool {
  platform::caps().has(x86::FMA)
}

/// AVX-512 foundation available on this machine.
#[must_use]
pub fn has_avx512f() -> bool {
  platform::caps().has(x86::AVX512F)
}

/// AVX-512 BW available on this machine.
#[must_use]
pub fn has_avx512bw() -> bool {
  platform::caps().has(x86::AVX512BW)
}

/// AVX-512 DQ available on this machine.
#[must_use]
pub fn has_avx512dq() -> bool {
  platform::caps().has(x86::AVX512DQ)
}

/// AVX-512 VPOPCNTDQ available on this machine.
#[must_use]
pub fn has_avx512vpopcntdq() -> bool {
  platform::caps().has(x86::AVX512VPOPCNTDQ)
}

/// NEON available on this machine.
#[must_use]
pub fn has_neon() -> bool {
  platform::caps().has(aarch64::NEON)
}

/// SVE available on this machine.
#[must_use]
pub fn has_sve() -> bool {
  platform::caps().has(aarch64::SVE)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn active_backend_name_is_nonempty() {
    assert!(!active_backend_name().is_empty());
  }

  #[test]
  fn predicates_are_consistent_with_arch() {
    // Capability bits are namespaced per family; the other family's bits
    // can never be set.
    #[cfg(target_arch = "x86_64")]
    {
      assert!(!has_neon());
      assert!(!has_sve());
    }
    #[cfg(target_arch = "aarch64")]
    {
      assert!(has_neon());
      assert!(!has_avx2());
    }
  }
}
