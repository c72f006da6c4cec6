//! Gas-property auxiliary evaluators backed by [`SimpleGasProperties`].
//!
//! Outputs are SI: kg/m³, Pa·s, m²/s, J/kg/K, W/m/K, m/s. Pore diameters
//! are configured in cm and converted through [`Length`].
//!
//! Knudsen diffusivity: D_K = (d_p/3)·√(8·R·T/(π·M))
//!
//! Effective pore diffusivity (Bosanquet): D_eff = (ε/τ) / (1/D_m + 1/D_K)
//!
//! Film mass transfer (Ranz–Marshall form):
//! Sh = 2 + 1.1·Re^{0.6}·Sc^{1/3}, k_m = Sh·D_m/L

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::materials::{SimpleGasConfig, SimpleGasProperties};
use crate::params::{self, Coupled, CoupledInput, FieldRegistry};
use crate::term::{AuxContext, AuxKernel, Material};
use crate::types::{Diffusivity, FieldId, Length};

/// Bulk mixture property (`GasDensity`, `GasViscosity`, `GasHeatCapacity`,
/// `GasThermalConductivity`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasPropertyConfig {
    pub variable: String,
    pub gas: SimpleGasConfig,
}

/// `GasMolecularDiffusivity`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasSpeciesPropertyConfig {
    pub variable: String,
    pub gas: SimpleGasConfig,
    pub species_index: usize,
}

/// `GasKnudsenDiffusivity` and `GasEffectiveDiffusivity`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasPoreDiffusivityConfig {
    pub variable: String,
    pub gas: SimpleGasConfig,
    pub species_index: usize,
    /// Mean pore diameter (cm)
    pub pore_diameter: CoupledInput,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    #[serde(default = "params::one")]
    pub tortuosity: CoupledInput,
}

/// `GasReynoldsNumber` and `GasFilmMassTransfer`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasFlowConfig {
    pub variable: String,
    pub gas: SimpleGasConfig,
    /// Species for film mass transfer
    #[serde(default)]
    pub species_index: usize,
    /// Superficial velocity magnitude (m/s)
    pub velocity: CoupledInput,
    /// Characteristic length, e.g. particle or hydraulic diameter (m)
    pub char_length: CoupledInput,
}

/// Which property a [`GasPropertyAux`] reports.
#[derive(Clone, Copy, Debug)]
pub enum GasProperty {
    Density,
    Viscosity,
    HeatCapacity,
    ThermalConductivity,
    MolecularDiffusivity {
        species: usize,
    },
    KnudsenDiffusivity {
        species: usize,
        pore_diameter: Coupled,
    },
    EffectiveDiffusivity {
        species: usize,
        pore_diameter: Coupled,
        porosity: Coupled,
        tortuosity: Coupled,
    },
    ReynoldsNumber {
        velocity: Coupled,
        length: Coupled,
    },
    FilmMassTransfer {
        species: usize,
        velocity: Coupled,
        length: Coupled,
    },
}

/// One gas property written to an auxiliary field.
#[derive(Clone, Debug)]
pub struct GasPropertyAux {
    name: &'static str,
    variable: FieldId,
    gas: SimpleGasProperties,
    property: GasProperty,
}

fn check_species(object: &'static str, gas: &SimpleGasProperties, species: usize) -> Result<usize> {
    if species >= gas.num_species() {
        return Err(ConfigurationError::OutOfRange {
            object,
            parameter: "species_index",
            value: species as f64,
            expected: "must index a configured species",
        });
    }
    Ok(species)
}

impl GasPropertyAux {
    fn build(
        name: &'static str,
        variable: &str,
        gas: &SimpleGasConfig,
        registry: &FieldRegistry,
        property: impl FnOnce(&SimpleGasProperties) -> Result<GasProperty>,
    ) -> Result<Self> {
        let gas = SimpleGasProperties::new(gas, registry)?;
        let property = property(&gas)?;
        debug!("{name}: {property:?}");
        Ok(Self {
            name,
            variable: registry.resolve_field(name, variable)?,
            gas,
            property,
        })
    }

    pub fn density(config: GasPropertyConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("GasDensity", &config.variable, &config.gas, registry, |_| {
            Ok(GasProperty::Density)
        })
    }

    pub fn viscosity(config: GasPropertyConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("GasViscosity", &config.variable, &config.gas, registry, |_| {
            Ok(GasProperty::Viscosity)
        })
    }

    pub fn heat_capacity(config: GasPropertyConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("GasHeatCapacity", &config.variable, &config.gas, registry, |_| {
            Ok(GasProperty::HeatCapacity)
        })
    }

    pub fn thermal_conductivity(config: GasPropertyConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("GasThermalConductivity", &config.variable, &config.gas, registry, |_| {
            Ok(GasProperty::ThermalConductivity)
        })
    }

    pub fn molecular_diffusivity(config: GasSpeciesPropertyConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "GasMolecularDiffusivity";
        Self::build(NAME, &config.variable, &config.gas, registry, |gas| {
            Ok(GasProperty::MolecularDiffusivity {
                species: check_species(NAME, gas, config.species_index)?,
            })
        })
    }

    pub fn knudsen_diffusivity(config: GasPoreDiffusivityConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "GasKnudsenDiffusivity";
        Self::build(NAME, &config.variable, &config.gas, registry, |gas| {
            Ok(GasProperty::KnudsenDiffusivity {
                species: check_species(NAME, gas, config.species_index)?,
                pore_diameter: registry.resolve(NAME, &config.pore_diameter)?,
            })
        })
    }

    pub fn effective_diffusivity(config: GasPoreDiffusivityConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "GasEffectiveDiffusivity";
        Self::build(NAME, &config.variable, &config.gas, registry, |gas| {
            Ok(GasProperty::EffectiveDiffusivity {
                species: check_species(NAME, gas, config.species_index)?,
                pore_diameter: registry.resolve(NAME, &config.pore_diameter)?,
                porosity: registry.resolve(NAME, &config.porosity)?,
                tortuosity: registry.resolve(NAME, &config.tortuosity)?,
            })
        })
    }

    pub fn reynolds_number(config: GasFlowConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "GasReynoldsNumber";
        Self::build(NAME, &config.variable, &config.gas, registry, |_| {
            Ok(GasProperty::ReynoldsNumber {
                velocity: registry.resolve(NAME, &config.velocity)?,
                length: registry.resolve(NAME, &config.char_length)?,
            })
        })
    }

    pub fn film_mass_transfer(config: GasFlowConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "GasFilmMassTransfer";
        Self::build(NAME, &config.variable, &config.gas, registry, |gas| {
            Ok(GasProperty::FilmMassTransfer {
                species: check_species(NAME, gas, config.species_index)?,
                velocity: registry.resolve(NAME, &config.velocity)?,
                length: registry.resolve(NAME, &config.char_length)?,
            })
        })
    }

    pub fn property(&self) -> GasProperty {
        self.property
    }

    fn knudsen(&self, ctx: &AuxContext, species: usize, pore_diameter: &Coupled) -> Diffusivity {
        let d = Length::from_centimeters(pore_diameter.value(ctx)).meters();
        let t = self.gas.temperature(ctx);
        let m = self.gas.species_molar_mass(species).kilograms_per_mole();
        let mean_speed = (8.0 * self.gas.gas_constant() * t / (PI * m)).sqrt();
        Diffusivity::from_m2_per_s(d / 3.0 * mean_speed)
    }

    fn reynolds(&self, ctx: &AuxContext, velocity: &Coupled, length: &Coupled) -> f64 {
        let props = self.gas.compute_properties(ctx);
        props.density * velocity.value(ctx).abs() * length.value(ctx) / props.viscosity.pascal_seconds()
    }
}

impl AuxKernel for GasPropertyAux {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        match &self.property {
            GasProperty::Density => self.gas.compute_properties(ctx).density,
            GasProperty::Viscosity => self.gas.compute_properties(ctx).viscosity.pascal_seconds(),
            GasProperty::HeatCapacity => self.gas.compute_properties(ctx).heat_capacity,
            GasProperty::ThermalConductivity => self.gas.compute_properties(ctx).thermal_conductivity,
            GasProperty::MolecularDiffusivity { species } => {
                self.gas.molecular_diffusivity(ctx, *species).m2_per_s()
            }
            GasProperty::KnudsenDiffusivity {
                species,
                pore_diameter,
            } => self.knudsen(ctx, *species, pore_diameter).m2_per_s(),
            GasProperty::EffectiveDiffusivity {
                species,
                pore_diameter,
                porosity,
                tortuosity,
            } => {
                let d_m = self.gas.molecular_diffusivity(ctx, *species).m2_per_s();
                let d_k = self.knudsen(ctx, *species, pore_diameter).m2_per_s();
                let bosanquet = 1.0 / (1.0 / d_m + 1.0 / d_k);
                porosity.value(ctx) / tortuosity.value(ctx) * bosanquet
            }
            GasProperty::ReynoldsNumber { velocity, length } => self.reynolds(ctx, velocity, length),
            GasProperty::FilmMassTransfer {
                species,
                velocity,
                length,
            } => {
                let props = self.gas.compute_properties(ctx);
                let d_m = self.gas.molecular_diffusivity(ctx, *species).m2_per_s();
                let re = self.reynolds(ctx, velocity, length);
                let sc = props.viscosity.pascal_seconds() / (props.density * d_m);
                let sh = 2.0 + 1.1 * re.powf(0.6) * sc.cbrt();
                sh * d_m / length.value(ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GAS_CONSTANT;
    use crate::materials::GasSpecies;
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    fn gas() -> SimpleGasConfig {
        SimpleGasConfig {
            temperature: "T".into(),
            pressure: CoupledInput::Constant(101.325),
            mole_fractions: vec!["y_o2".into(), "y_n2".into()],
            species: vec![
                GasSpecies {
                    molar_mass: 32.0,
                    sutherland_viscosity: 1.919e-5,
                    sutherland_temperature: 273.15,
                    sutherland_constant: 139.0,
                    diffusion_volume: 16.3,
                    heat_capacity: 918.0,
                },
                GasSpecies {
                    molar_mass: 28.014,
                    sutherland_viscosity: 1.663e-5,
                    sutherland_temperature: 273.15,
                    sutherland_constant: 107.0,
                    diffusion_volume: 18.5,
                    heat_capacity: 1040.0,
                },
            ],
            gas_constant: GAS_CONSTANT,
        }
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["aux", "T", "y_o2", "y_n2", "v"])
    }

    fn fields() -> [FieldValue; 5] {
        [
            FieldValue::new(0.0),
            FieldValue::new(400.0),
            FieldValue::new(0.21),
            FieldValue::new(0.79),
            FieldValue::new(0.5),
        ]
    }

    fn pore_config(pore_diameter_cm: f64) -> GasPoreDiffusivityConfig {
        GasPoreDiffusivityConfig {
            variable: "aux".into(),
            gas: gas(),
            species_index: 0,
            pore_diameter: CoupledInput::Constant(pore_diameter_cm),
            porosity: CoupledInput::Constant(0.4),
            tortuosity: CoupledInput::Constant(2.0),
        }
    }

    #[test]
    fn test_knudsen_uses_centimeter_pores() {
        let aux = GasPropertyAux::knudsen_diffusivity(pore_config(1.0e-5), &registry()).unwrap();
        let f = fields();
        let value = aux.compute_value(&AuxContext::new(&f));
        let expected = 1.0e-7 / 3.0 * (8.0 * GAS_CONSTANT * 400.0 / (PI * 0.032)).sqrt();
        assert!((value - expected).abs() < TOL * expected.max(1.0));
    }

    #[test]
    fn test_effective_diffusivity_bounds() {
        let reg = registry();
        let f = fields();
        let ctx = AuxContext::new(&f);

        let eff = GasPropertyAux::effective_diffusivity(pore_config(1.0e-5), &reg).unwrap();
        let knudsen = GasPropertyAux::knudsen_diffusivity(pore_config(1.0e-5), &reg).unwrap();
        let d_eff = eff.compute_value(&ctx);
        let d_k = knudsen.compute_value(&ctx);
        assert!(d_eff > 0.0);
        assert!(d_eff < 0.2 * d_k + 1e-18);
    }

    #[test]
    fn test_density_and_reynolds() {
        let reg = registry();
        let f = fields();
        let ctx = AuxContext::new(&f);
        let density = GasPropertyAux::density(
            GasPropertyConfig {
                variable: "aux".into(),
                gas: gas(),
            },
            &reg,
        )
        .unwrap();
        let mean_mass = 0.21 * 0.032 + 0.79 * 0.028014;
        let rho = 101_325.0 * mean_mass / (GAS_CONSTANT * 400.0);
        assert!((density.compute_value(&ctx) - rho).abs() < 1e-10);

        let flow = GasFlowConfig {
            variable: "aux".into(),
            gas: gas(),
            species_index: 0,
            velocity: "v".into(),
            char_length: CoupledInput::Constant(0.01),
        };
        let re = GasPropertyAux::reynolds_number(flow.clone(), &reg).unwrap();
        let km = GasPropertyAux::film_mass_transfer(flow, &reg).unwrap();
        assert!(re.compute_value(&ctx) > 0.0);
        // Sh ≥ 2, so km ≥ 2·D/L
        let d_m = GasPropertyAux::molecular_diffusivity(
            GasSpeciesPropertyConfig {
                variable: "aux".into(),
                gas: gas(),
                species_index: 0,
            },
            &reg,
        )
        .unwrap()
        .compute_value(&ctx);
        assert!(km.compute_value(&ctx) > 2.0 * d_m / 0.01);
    }

    #[test]
    fn test_species_index_out_of_range() {
        let mut config = pore_config(1.0e-5);
        config.species_index = 2;
        assert!(matches!(
            GasPropertyAux::knudsen_diffusivity(config, &registry()),
            Err(ConfigurationError::OutOfRange { parameter: "species_index", .. })
        ));
    }

    #[test]
    fn test_gas_config_from_toml() {
        let text = r#"
            variable = "aux"
            [gas]
            temperature = "T"
            mole_fractions = ["y_o2", "y_n2"]
            [[gas.species]]
            molar_mass = 32.0
            sutherland_viscosity = 1.919e-5
            sutherland_constant = 139.0
            diffusion_volume = 16.3
            heat_capacity = 918.0
            [[gas.species]]
            molar_mass = 28.014
            sutherland_viscosity = 1.663e-5
            sutherland_constant = 107.0
            diffusion_volume = 18.5
            heat_capacity = 1040.0
        "#;
        let config: GasPropertyConfig = toml::from_str(text).unwrap();
        let aux = GasPropertyAux::heat_capacity(config, &registry()).unwrap();
        let f = fields();
        let cp = aux.compute_value(&AuxContext::new(&f));
        assert!(cp > 918.0 && cp < 1040.0);
    }
}
