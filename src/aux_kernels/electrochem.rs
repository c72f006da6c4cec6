//! Electrochemical derived quantities.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{default_faraday, default_gas_constant, MIN_CONDUCTIVITY_FLOOR};
use crate::electrochem::{davies_activity_coefficient, IonSet};
use crate::error::Result;
use crate::kernels::ElectrodeCurrentConfig;
use crate::params::{self, check_direction, check_lengths, Coupled, CoupledInput, FieldRegistry};
use crate::term::{AuxContext, AuxKernel};
use crate::types::FieldId;

/// `ElectrolyteConductivity`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElectrolyteConductivityConfig {
    pub variable: String,
    #[serde(default = "params::standard_temperature")]
    pub temperature: CoupledInput,
    pub ion_conc: Vec<CoupledInput>,
    pub ion_valence: Vec<f64>,
    pub diffusion: Vec<CoupledInput>,
    /// Lower bound added to the computed conductivity, raised to 1e-30
    #[serde(default = "default_min_conductivity")]
    pub min_conductivity: f64,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
}

fn default_min_conductivity() -> f64 {
    MIN_CONDUCTIVITY_FLOOR
}

/// σ = F²/(R·T)·Σ zᵢ²·Dᵢ·Cᵢ + σ_min
#[derive(Clone, Debug)]
pub struct ElectrolyteConductivity {
    variable: FieldId,
    temperature: Coupled,
    ions: IonSet,
    min_conductivity: f64,
    faraday: f64,
    gas_constant: f64,
}

impl ElectrolyteConductivity {
    const NAME: &'static str = "ElectrolyteConductivity";

    pub fn new(config: ElectrolyteConductivityConfig, registry: &FieldRegistry) -> Result<Self> {
        check_lengths(
            Self::NAME,
            "ion_conc",
            config.ion_conc.len(),
            "diffusion",
            config.diffusion.len(),
        )?;
        let ions = IonSet::from_inputs(
            Self::NAME,
            &config.ion_conc,
            &config.ion_valence,
            &config.diffusion,
            registry,
        )?;
        let min_conductivity = if config.min_conductivity < MIN_CONDUCTIVITY_FLOOR {
            warn!(
                "{}: min_conductivity {} raised to {MIN_CONDUCTIVITY_FLOOR}",
                Self::NAME,
                config.min_conductivity
            );
            MIN_CONDUCTIVITY_FLOOR
        } else {
            config.min_conductivity
        };
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            temperature: registry.resolve(Self::NAME, &config.temperature)?,
            ions,
            min_conductivity,
            faraday: config.faraday,
            gas_constant: config.gas_constant,
        })
    }

    pub fn min_conductivity(&self) -> f64 {
        self.min_conductivity
    }
}

impl AuxKernel for ElectrolyteConductivity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let sum = self.ions.conduction_sum(ctx);
        if sum == 0.0 {
            return self.min_conductivity;
        }
        let rt = self.gas_constant * self.temperature.value(ctx);
        self.faraday * self.faraday / rt * sum + self.min_conductivity
    }
}

/// `IonicStrength`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IonicStrengthConfig {
    pub variable: String,
    pub ion_conc: Vec<CoupledInput>,
    pub ion_valence: Vec<f64>,
}

/// I = ½ Σ zᵢ²·Cᵢ in mol/L.
#[derive(Clone, Debug)]
pub struct IonicStrength {
    variable: FieldId,
    ions: IonSet,
}

impl IonicStrength {
    const NAME: &'static str = "IonicStrength";

    pub fn new(config: IonicStrengthConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            ions: IonSet::from_inputs(
                Self::NAME,
                &config.ion_conc,
                &config.ion_valence,
                &[],
                registry,
            )?,
        })
    }
}

impl AuxKernel for IonicStrength {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.ions.ionic_strength(ctx)
    }
}

/// `DaviesActivityCoefficient`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaviesActivityCoefficientConfig {
    pub variable: String,
    pub ion_conc: Vec<CoupledInput>,
    pub ion_valence: Vec<f64>,
    /// Valence of the ion whose coefficient is reported
    pub valence: f64,
}

#[derive(Clone, Debug)]
pub struct DaviesActivityCoefficient {
    variable: FieldId,
    ions: IonSet,
    valence: f64,
}

impl DaviesActivityCoefficient {
    const NAME: &'static str = "DaviesActivityCoefficient";

    pub fn new(config: DaviesActivityCoefficientConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            ions: IonSet::from_inputs(
                Self::NAME,
                &config.ion_conc,
                &config.ion_valence,
                &[],
                registry,
            )?,
            valence: config.valence,
        })
    }
}

impl AuxKernel for DaviesActivityCoefficient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        davies_activity_coefficient(self.valence, self.ions.ionic_strength(ctx))
    }
}

/// Electrode current component reported as an auxiliary value:
/// J_dir = −ε_s·σ·∂Φ_s/∂x_dir
#[derive(Clone, Debug)]
pub struct ElectrodeCurrentDensity {
    variable: FieldId,
    potential: FieldId,
    solid_frac: Coupled,
    conductivity: Coupled,
    direction: usize,
}

impl ElectrodeCurrentDensity {
    const NAME: &'static str = "ElectrodeCurrentDensity";

    pub fn new(config: ElectrodeCurrentConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            direction: check_direction(Self::NAME, config.direction)?,
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            potential: registry.resolve_field(Self::NAME, &config.electric_potential)?,
            solid_frac: registry.resolve(Self::NAME, &config.solid_frac)?,
            conductivity: registry.resolve(Self::NAME, &config.conductivity)?,
        })
    }
}

impl AuxKernel for ElectrodeCurrentDensity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let grad = ctx.fields[self.potential].gradient[self.direction];
        -self.solid_frac.value(ctx) * self.conductivity.value(ctx) * grad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FARADAY, GAS_CONSTANT};
    use crate::error::ConfigurationError;
    use crate::term::FieldValue;
    use nalgebra::Vector3;

    fn conductivity(min_conductivity: f64) -> ElectrolyteConductivity {
        let reg = FieldRegistry::with_fields(["sigma", "na", "cl"]);
        ElectrolyteConductivity::new(
            ElectrolyteConductivityConfig {
                variable: "sigma".into(),
                temperature: CoupledInput::Constant(300.0),
                ion_conc: vec!["na".into(), "cl".into()],
                ion_valence: vec![1.0, -1.0],
                diffusion: vec![
                    CoupledInput::Constant(1.3e-9),
                    CoupledInput::Constant(2.0e-9),
                ],
                min_conductivity,
                faraday: FARADAY,
                gas_constant: GAS_CONSTANT,
            },
            &reg,
        )
        .unwrap()
    }

    #[test]
    fn test_conductivity_value() {
        let aux = conductivity(0.0);
        let f = [FieldValue::new(0.0), FieldValue::new(100.0), FieldValue::new(100.0)];
        let expected =
            FARADAY * FARADAY / (GAS_CONSTANT * 300.0) * (1.3e-9 + 2.0e-9) * 100.0 + 1e-30;
        let value = aux.compute_value(&AuxContext::new(&f));
        assert!((value - expected).abs() < 1e-12 * expected);
    }

    #[test]
    fn test_conductivity_floor_is_raised() {
        let aux = conductivity(-5.0);
        assert_eq!(aux.min_conductivity(), MIN_CONDUCTIVITY_FLOOR);
        let f = [FieldValue::new(0.0); 3];
        assert_eq!(aux.compute_value(&AuxContext::new(&f)), MIN_CONDUCTIVITY_FLOOR);
    }

    #[test]
    fn test_conductivity_zero_concentration_returns_min() {
        let aux = conductivity(1e-4);
        let f = [FieldValue::new(0.0); 3];
        assert_eq!(aux.compute_value(&AuxContext::new(&f)), 1e-4);
    }

    #[test]
    fn test_conductivity_requires_matching_lists() {
        let reg = FieldRegistry::with_fields(["sigma", "na", "cl"]);
        let err = ElectrolyteConductivity::new(
            ElectrolyteConductivityConfig {
                variable: "sigma".into(),
                temperature: CoupledInput::Constant(300.0),
                ion_conc: vec!["na".into(), "cl".into()],
                ion_valence: vec![1.0, -1.0],
                diffusion: vec![CoupledInput::Constant(1.3e-9)],
                min_conductivity: 0.0,
                faraday: FARADAY,
                gas_constant: GAS_CONSTANT,
            },
            &reg,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::LengthMismatch { .. }));
    }

    #[test]
    fn test_ionic_strength_and_davies() {
        let reg = FieldRegistry::with_fields(["aux", "ca", "cl"]);
        let ions = || vec![CoupledInput::from("ca"), CoupledInput::from("cl")];
        let strength = IonicStrength::new(
            IonicStrengthConfig {
                variable: "aux".into(),
                ion_conc: ions(),
                ion_valence: vec![2.0, -1.0],
            },
            &reg,
        )
        .unwrap();
        let davies = DaviesActivityCoefficient::new(
            DaviesActivityCoefficientConfig {
                variable: "aux".into(),
                ion_conc: ions(),
                ion_valence: vec![2.0, -1.0],
                valence: 2.0,
            },
            &reg,
        )
        .unwrap();

        // 10 mol/m³ CaCl₂: I = ½(4·0.01 + 1·0.02) = 0.03 mol/L
        let f = [FieldValue::new(0.0), FieldValue::new(10.0), FieldValue::new(20.0)];
        let ctx = AuxContext::new(&f);
        assert!((strength.compute_value(&ctx) - 0.03).abs() < 1e-12);
        let expected = davies_activity_coefficient(2.0, 0.03);
        assert!((davies.compute_value(&ctx) - expected).abs() < 1e-14);
        assert!(expected < 1.0);
    }

    #[test]
    fn test_electrode_current_density() {
        let reg = FieldRegistry::with_fields(["j", "phi"]);
        let aux = ElectrodeCurrentDensity::new(
            ElectrodeCurrentConfig {
                variable: "j".into(),
                electric_potential: "phi".into(),
                solid_frac: CoupledInput::Constant(0.5),
                conductivity: CoupledInput::Constant(50.0),
                direction: 1,
            },
            &reg,
        )
        .unwrap();
        let f = [
            FieldValue::new(0.0),
            FieldValue::new(0.0).with_gradient(Vector3::new(9.0, 2.0, -1.0)),
        ];
        assert!((aux.compute_value(&AuxContext::new(&f)) + 50.0).abs() < 1e-12);
    }
}
