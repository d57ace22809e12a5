//! Structural self-checks for [`Topology`](crate::topology::Topology) and
//! [`DistributedArray`](crate::data::DistributedArray).
//!
//! Both types are validated when built; these hooks re-run the same checks on
//! a live value.

use crate::halo_error::HaloGridError;

pub trait DebugInvariants {
    /// Panic on a broken invariant when checks are compiled in.
    fn debug_assert_invariants(&self);

    /// Re-run every construction-time check, stopping at the first failure.
    fn validate_invariants(&self) -> Result<(), HaloGridError>;

    fn is_valid(&self) -> bool {
        self.validate_invariants().is_ok()
    }
}

/// `debug_invariants!(check, "Owner::method")` panics with the failed
/// check's error, in debug builds or with `check-invariants` /
/// `strict-invariants` enabled. Compiles to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $($site:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(err) = $check {
            panic!(concat!("halo-grid invariant broken in ", $($site)*, ": {}"), err);
        }
    };
}
