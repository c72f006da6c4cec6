//! Butler–Volmer electrode kinetics.
//!
//! η = Φ_s − Φ_e − E₀
//!
//! r = k_ox · Π C_ox^{v} · exp(α·nF·η/(R·T)) − k_red · Π C_red^{v} · exp(−(1−α)·nF·η/(R·T))
//!
//! and the matching current density i = n·F·a·(−r) for specific area a.

use serde::{Deserialize, Serialize};

use crate::constants::{default_faraday, default_gas_constant};
use crate::error::Result;
use crate::params::{
    self, check_in_range, check_lengths, power_product, power_product_derivative, Coupled,
    CoupledInput, FieldRegistry,
};
use crate::term::FieldSource;
use crate::types::FieldId;

/// Configuration shared by the Butler–Volmer rate kernel and its initial
/// condition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButlerVolmerRateConfig {
    /// Rate variable
    pub variable: String,
    /// Oxidation rate constant k_ox
    #[serde(default = "params::one_f64")]
    pub oxidation_rate: f64,
    /// Reduction rate constant k_red
    #[serde(default = "params::one_f64")]
    pub reduction_rate: f64,
    /// Charge-transfer coefficient α
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Electrons transferred n
    #[serde(default = "params::one_f64")]
    pub electrons: f64,
    /// Equilibrium potential E₀ (V)
    #[serde(default)]
    pub reference_potential: f64,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
    pub electrode_potential: CoupledInput,
    pub electrolyte_potential: CoupledInput,
    #[serde(default = "params::standard_temperature")]
    pub temperature: CoupledInput,
    #[serde(default)]
    pub oxidants: Vec<CoupledInput>,
    #[serde(default)]
    pub oxidant_stoich: Vec<f64>,
    #[serde(default)]
    pub reductants: Vec<CoupledInput>,
    #[serde(default)]
    pub reductant_stoich: Vec<f64>,
}

fn default_alpha() -> f64 {
    0.5
}

/// Resolved Butler–Volmer rate expression.
#[derive(Clone, Debug)]
pub struct ButlerVolmer {
    oxidation_rate: f64,
    reduction_rate: f64,
    alpha: f64,
    electrons: f64,
    reference_potential: f64,
    faraday: f64,
    gas_constant: f64,
    electrode_potential: Coupled,
    electrolyte_potential: Coupled,
    temperature: Coupled,
    oxidants: Vec<Coupled>,
    oxidant_stoich: Vec<f64>,
    reductants: Vec<Coupled>,
    reductant_stoich: Vec<f64>,
}

impl ButlerVolmer {
    /// Resolve a configuration against the host's fields.
    pub fn from_config(
        object: &'static str,
        config: &ButlerVolmerRateConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        check_lengths(
            object,
            "oxidants",
            config.oxidants.len(),
            "oxidant_stoich",
            config.oxidant_stoich.len(),
        )?;
        check_lengths(
            object,
            "reductants",
            config.reductants.len(),
            "reductant_stoich",
            config.reductant_stoich.len(),
        )?;
        check_in_range(object, "alpha", config.alpha, 0.0, 1.0, "must be in [0, 1]")?;

        Ok(Self {
            oxidation_rate: config.oxidation_rate,
            reduction_rate: config.reduction_rate,
            alpha: config.alpha,
            electrons: config.electrons,
            reference_potential: config.reference_potential,
            faraday: config.faraday,
            gas_constant: config.gas_constant,
            electrode_potential: registry.resolve(object, &config.electrode_potential)?,
            electrolyte_potential: registry.resolve(object, &config.electrolyte_potential)?,
            temperature: registry.resolve(object, &config.temperature)?,
            oxidants: registry.resolve_all(object, &config.oxidants)?,
            oxidant_stoich: config.oxidant_stoich.clone(),
            reductants: registry.resolve_all(object, &config.reductants)?,
            reductant_stoich: config.reductant_stoich.clone(),
        })
    }

    /// Overpotential η.
    #[inline]
    pub fn overpotential<S: FieldSource>(&self, source: &S) -> f64 {
        self.electrode_potential.value(source)
            - self.electrolyte_potential.value(source)
            - self.reference_potential
    }

    /// nF/(RT)
    #[inline]
    fn inverse_thermal_voltage<S: FieldSource>(&self, source: &S) -> f64 {
        self.electrons * self.faraday / (self.gas_constant * self.temperature.value(source))
    }

    /// Net reaction rate.
    pub fn rate<S: FieldSource>(&self, source: &S) -> f64 {
        let x = self.inverse_thermal_voltage(source) * self.overpotential(source);
        let ox = power_product(&self.oxidants, &self.oxidant_stoich, source);
        let red = power_product(&self.reductants, &self.reductant_stoich, source);
        self.oxidation_rate * ox * (self.alpha * x).exp()
            - self.reduction_rate * red * (-(1.0 - self.alpha) * x).exp()
    }

    /// Derivative of [`Self::rate`] with respect to `wrt`.
    pub fn rate_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        let f = self.inverse_thermal_voltage(source);
        let eta = self.overpotential(source);
        let t = self.temperature.value(source);
        let x = f * eta;

        let d_eta = self.electrode_potential.indicator(wrt) - self.electrolyte_potential.indicator(wrt);
        let d_f = -self.temperature.indicator(wrt) * f / t;
        let d_x = f * d_eta + eta * d_f;

        let ox = power_product(&self.oxidants, &self.oxidant_stoich, source);
        let red = power_product(&self.reductants, &self.reductant_stoich, source);
        let d_ox = power_product_derivative(&self.oxidants, &self.oxidant_stoich, source, wrt);
        let d_red = power_product_derivative(&self.reductants, &self.reductant_stoich, source, wrt);

        let a = (self.alpha * x).exp();
        let b = (-(1.0 - self.alpha) * x).exp();

        self.oxidation_rate * (d_ox * a + ox * a * self.alpha * d_x)
            - self.reduction_rate * (d_red * b - red * b * (1.0 - self.alpha) * d_x)
    }

    /// Every coupled input of the rate.
    pub fn inputs(&self) -> Vec<Coupled> {
        let mut all = vec![
            self.electrode_potential,
            self.electrolyte_potential,
            self.temperature,
        ];
        all.extend(self.oxidants.iter().copied());
        all.extend(self.reductants.iter().copied());
        all
    }
}

/// Configuration shared by the current-density kernel and its initial
/// condition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrentDensityConfig {
    /// Current-density variable
    pub variable: String,
    /// Reaction rate field
    pub rate: CoupledInput,
    /// Specific reactive area (area per volume)
    #[serde(default = "params::one")]
    pub specific_area: CoupledInput,
    #[serde(default = "params::one_f64")]
    pub electrons: f64,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
}

/// Current density i = n·F·a·(−r).
#[derive(Clone, Copy, Debug)]
pub struct CurrentDensity {
    rate: Coupled,
    specific_area: Coupled,
    electrons: f64,
    faraday: f64,
}

impl CurrentDensity {
    pub fn from_config(
        object: &'static str,
        config: &CurrentDensityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        Ok(Self {
            rate: registry.resolve(object, &config.rate)?,
            specific_area: registry.resolve(object, &config.specific_area)?,
            electrons: config.electrons,
            faraday: config.faraday,
        })
    }

    #[inline]
    pub fn value<S: FieldSource>(&self, source: &S) -> f64 {
        self.electrons * self.faraday * self.specific_area.value(source) * -self.rate.value(source)
    }

    pub fn derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        let nf = self.electrons * self.faraday;
        -nf * (self.specific_area.indicator(wrt) * self.rate.value(source)
            + self.specific_area.value(source) * self.rate.indicator(wrt))
    }

    pub fn inputs(&self) -> [Coupled; 2] {
        [self.rate, self.specific_area]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{AuxContext, FieldValue};

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["r", "phi_s", "phi_e", "T", "ox", "red", "a"])
    }

    fn bv_config() -> ButlerVolmerRateConfig {
        ButlerVolmerRateConfig {
            variable: "r".into(),
            oxidation_rate: 2.0,
            reduction_rate: 0.5,
            alpha: 0.4,
            electrons: 2.0,
            reference_potential: 0.1,
            faraday: crate::constants::FARADAY,
            gas_constant: crate::constants::GAS_CONSTANT,
            electrode_potential: "phi_s".into(),
            electrolyte_potential: "phi_e".into(),
            temperature: "T".into(),
            oxidants: vec!["ox".into()],
            oxidant_stoich: vec![1.0],
            reductants: vec!["red".into()],
            reductant_stoich: vec![2.0],
        }
    }

    #[test]
    fn test_rate_at_equilibrium_potential() {
        let bv = ButlerVolmer::from_config("Test", &bv_config(), &registry()).unwrap();
        // η = 0 → r = k_ox·ox − k_red·red²
        let fields = [
            FieldValue::new(0.0),
            FieldValue::new(0.3),
            FieldValue::new(0.2),
            FieldValue::new(300.0),
            FieldValue::new(1.5),
            FieldValue::new(2.0),
            FieldValue::new(1.0),
        ];
        let ctx = AuxContext::new(&fields);
        assert!(bv.overpotential(&ctx).abs() < 1e-14);
        assert!((bv.rate(&ctx) - (3.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rate_derivatives_numeric() {
        let bv = ButlerVolmer::from_config("Test", &bv_config(), &registry()).unwrap();
        let fields = [
            FieldValue::new(0.0),
            FieldValue::new(0.31),
            FieldValue::new(0.2),
            FieldValue::new(310.0),
            FieldValue::new(1.5),
            FieldValue::new(2.0),
            FieldValue::new(1.0),
        ];
        for id in 1..6 {
            let step = 1e-7 * fields[id].value.abs().max(1.0);
            let mut plus = fields;
            let mut minus = fields;
            plus[id].value += step;
            minus[id].value -= step;
            let numeric =
                (bv.rate(&AuxContext::new(&plus)) - bv.rate(&AuxContext::new(&minus))) / (2.0 * step);
            let analytic = bv.rate_derivative(&AuxContext::new(&fields), FieldId::new(id));
            assert!(
                (numeric - analytic).abs() <= 1e-5 * analytic.abs().max(1e-8),
                "field {id}: {numeric} vs {analytic}"
            );
        }
    }

    #[test]
    fn test_alpha_out_of_range() {
        let mut cfg = bv_config();
        cfg.alpha = 1.5;
        assert!(ButlerVolmer::from_config("Test", &cfg, &registry()).is_err());
    }

    #[test]
    fn test_current_density() {
        let reg = registry();
        let cfg = CurrentDensityConfig {
            variable: "r".into(),
            rate: "ox".into(),
            specific_area: "a".into(),
            electrons: 2.0,
            faraday: 1.0,
        };
        let cd = CurrentDensity::from_config("Test", &cfg, &reg).unwrap();
        let mut fields = [FieldValue::new(0.0); 7];
        fields[4] = FieldValue::new(3.0);
        fields[6] = FieldValue::new(5.0);
        let ctx = AuxContext::new(&fields);
        assert!((cd.value(&ctx) + 30.0).abs() < 1e-12);
        assert!((cd.derivative(&ctx, FieldId::new(4)) + 10.0).abs() < 1e-12);
        assert!((cd.derivative(&ctx, FieldId::new(6)) + 6.0).abs() < 1e-12);
    }
}
