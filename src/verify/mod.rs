//! Numerical verification of analytic Jacobians.
//!
//! Used by the test suite and available to hosts that want to validate a
//! term configuration before a long run:
//!
//! ```ignore
//! let report = check_kernel(&kernel, &ctx, &JacobianCheck::default());
//! assert!(report.passed(), "{report}");
//! ```

mod jacobian;

pub use jacobian::{
    check_interface_kernel, check_kernel, JacobianCheck, JacobianEntry, JacobianReport,
};
