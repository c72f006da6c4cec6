//! Arrhenius rate constants.
//!
//! k(T) = A · T^β · exp(−E / (R·T))
//!
//! with the modified-Arrhenius exponent β = 1 by default, so the plain law
//! is k = A·T·exp(−E/(R·T)).
//!
//! dk/dT = k · (β/T + E/(R·T²))

use serde::{Deserialize, Serialize};

use crate::constants::GAS_CONSTANT;

/// Arrhenius rate-constant parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Arrhenius {
    /// Pre-exponential factor A
    pub pre_exponential: f64,
    /// Activation energy E (J/mol)
    pub activation_energy: f64,
    /// Temperature exponent β
    pub beta: f64,
    /// Gas constant R (J/K/mol)
    pub gas_constant: f64,
}

impl Arrhenius {
    /// Create with β = 1 and the default gas constant.
    pub fn new(pre_exponential: f64, activation_energy: f64) -> Self {
        Self {
            pre_exponential,
            activation_energy,
            beta: 1.0,
            gas_constant: GAS_CONSTANT,
        }
    }

    /// Set the temperature exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the gas constant.
    pub fn with_gas_constant(mut self, gas_constant: f64) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    /// A rate constant that is identically zero.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Rate constant at temperature `t`.
    #[inline]
    pub fn rate(&self, t: f64) -> f64 {
        if self.pre_exponential == 0.0 {
            return 0.0;
        }
        self.pre_exponential
            * t.powf(self.beta)
            * (-self.activation_energy / (self.gas_constant * t)).exp()
    }

    /// dk/dT at temperature `t`.
    #[inline]
    pub fn rate_derivative(&self, t: f64) -> f64 {
        if self.pre_exponential == 0.0 {
            return 0.0;
        }
        self.rate(t) * (self.beta / t + self.activation_energy / (self.gas_constant * t * t))
    }

    /// Reverse rate constant consistent with thermodynamic equilibrium.
    ///
    /// E_r = E_f − ΔH, A_r = A_f · exp(−ΔS/R)
    pub fn equilibrium_reverse(&self, enthalpy: f64, entropy: f64) -> Self {
        Self {
            pre_exponential: self.pre_exponential * (-entropy / self.gas_constant).exp(),
            activation_energy: self.activation_energy - enthalpy,
            beta: self.beta,
            gas_constant: self.gas_constant,
        }
    }
}
