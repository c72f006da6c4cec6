//! Initial conditions that seed an algebraic variable consistently.
//!
//! Each condition evaluates the relation its sibling kernel constrains, so
//! the first nonlinear residual of that kernel starts at zero.

mod algebraic;

pub use algebraic::{ActivityIC, ButlerVolmerCurrentDensityIC, ButlerVolmerRateIC, CoupledSumIC};
