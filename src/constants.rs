//! Physical constants used as parameter defaults.
//!
//! Every term that uses one of these exposes it as an overridable
//! configuration parameter; these are only the defaults.

/// Faraday constant (C/mol)
pub const FARADAY: f64 = 96485.3;

/// Universal gas constant (J/K/mol)
pub const GAS_CONSTANT: f64 = 8.314462;

/// Floor applied to electrolyte conductivity (S/m)
pub const MIN_CONDUCTIVITY_FLOOR: f64 = 1e-30;

/// Additive viscosity floor used before dividing by viscosity (Pa·s)
pub const VISCOSITY_FLOOR: f64 = 1e-15;

/// Default temperature when none is coupled (K)
pub const STANDARD_TEMPERATURE: f64 = 298.15;

pub(crate) fn default_faraday() -> f64 {
    FARADAY
}

pub(crate) fn default_gas_constant() -> f64 {
    GAS_CONSTANT
}
