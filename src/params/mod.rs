//! Parameter plumbing shared by every term.
//!
//! - [`CoupledInput`] / [`Coupled`]: coefficients that are either a field or a constant
//! - [`FieldRegistry`]: host-provided name → index table
//! - validation helpers used by term constructors

mod coupled;
mod registry;
mod validate;

pub use coupled::{
    collect_coupled, power_product, power_product_derivative, product, product_derivative, Coupled,
    CoupledInput,
};
pub use registry::FieldRegistry;
pub use validate::{
    check_direction, check_in_range, check_lengths, check_non_empty, check_non_negative,
    check_positive,
};

/// Serde default for coefficients that default to the constant 1.
pub(crate) fn one() -> CoupledInput {
    CoupledInput::Constant(1.0)
}

/// Serde default for coefficients that default to the constant 0.
pub(crate) fn zero() -> CoupledInput {
    CoupledInput::Constant(0.0)
}

/// Serde default for temperatures: standard temperature.
pub(crate) fn standard_temperature() -> CoupledInput {
    CoupledInput::Constant(crate::constants::STANDARD_TEMPERATURE)
}

pub(crate) fn one_f64() -> f64 {
    1.0
}
