//! Ideal-gas mixture properties.
//!
//! Per-species correlations combined with mole-fraction mixing rules:
//!
//! - Density: ρ = P·M̄/(R·T), M̄ = Σ yᵢMᵢ
//! - Viscosity: Sutherland per species,
//!   μᵢ = μ₀ᵢ·(T/T₀ᵢ)^{3/2}·(T₀ᵢ + Sᵢ)/(T + Sᵢ),
//!   mixed with Herning–Zipperer μ = Σ yᵢμᵢ√Mᵢ / Σ yᵢ√Mᵢ
//! - Binary diffusivity: Fuller, in cm²/s with P in atm and M in g/mol,
//!   D_ij = 0.00143·T^{1.75} / (P·√M_ij·(V_i^{1/3} + V_j^{1/3})²)
//! - Mixture diffusivity: Wilke, D_i,m = (1 − yᵢ) / Σ_{j≠i} y_j/D_ij
//! - Heat capacity: mass-fraction average of cpᵢ
//! - Thermal conductivity: modified Eucken per species,
//!   kᵢ = μᵢ·(cpᵢ + 1.25·R/Mᵢ), mole-fraction average
//!
//! Pressure is coupled in kPa. Molar masses are configured in g/mol.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{default_gas_constant, STANDARD_TEMPERATURE};
use crate::error::Result;
use crate::params::{check_lengths, check_non_empty, check_positive, Coupled, CoupledInput, FieldRegistry};
use crate::term::{FieldSource, Material};
use crate::types::{Diffusivity, MolarMass, Pressure, Viscosity};

/// Fuller correlation prefactor (cm²/s, atm, g/mol units).
const FULLER_PREFACTOR: f64 = 0.00143;

/// Per-species gas data.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasSpecies {
    /// Molar mass (g/mol)
    pub molar_mass: f64,
    /// Sutherland reference viscosity μ₀ (Pa·s)
    pub sutherland_viscosity: f64,
    /// Sutherland reference temperature T₀ (K)
    #[serde(default = "default_sutherland_temperature")]
    pub sutherland_temperature: f64,
    /// Sutherland constant S (K)
    pub sutherland_constant: f64,
    /// Fuller diffusion volume (cm³/mol)
    pub diffusion_volume: f64,
    /// Specific heat capacity (J/kg/K)
    pub heat_capacity: f64,
}

fn default_sutherland_temperature() -> f64 {
    273.15
}

/// Configuration of a gas mixture.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleGasConfig {
    #[serde(default = "default_temperature")]
    pub temperature: CoupledInput,
    /// Total pressure (kPa)
    #[serde(default = "default_pressure")]
    pub pressure: CoupledInput,
    pub mole_fractions: Vec<CoupledInput>,
    pub species: Vec<GasSpecies>,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
}

fn default_temperature() -> CoupledInput {
    CoupledInput::Constant(STANDARD_TEMPERATURE)
}

fn default_pressure() -> CoupledInput {
    CoupledInput::Constant(101.325)
}

/// Mixture properties at one point, in SI units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Temperature (K)
    pub temperature: f64,
    /// Total pressure
    pub pressure: Pressure,
    /// Mean molar mass
    pub molar_mass: MolarMass,
    /// Density (kg/m³)
    pub density: f64,
    /// Dynamic viscosity
    pub viscosity: Viscosity,
    /// Specific heat capacity (J/kg/K)
    pub heat_capacity: f64,
    /// Thermal conductivity (W/m/K)
    pub thermal_conductivity: f64,
}

/// Ideal-gas mixture material.
#[derive(Clone, Debug)]
pub struct SimpleGasProperties {
    temperature: Coupled,
    pressure: Coupled,
    mole_fractions: Vec<Coupled>,
    species: Vec<GasSpecies>,
    gas_constant: f64,
}

impl SimpleGasProperties {
    const NAME: &'static str = "SimpleGasProperties";

    /// Resolve a gas configuration.
    pub fn new(config: &SimpleGasConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        check_non_empty(object, "species", config.species.len())?;
        check_lengths(
            object,
            "mole_fractions",
            config.mole_fractions.len(),
            "species",
            config.species.len(),
        )?;
        for s in &config.species {
            check_positive(object, "molar_mass", s.molar_mass)?;
            check_positive(object, "diffusion_volume", s.diffusion_volume)?;
            check_positive(object, "sutherland_temperature", s.sutherland_temperature)?;
        }
        debug!("{object}: {} species", config.species.len());
        Ok(Self {
            temperature: registry.resolve(object, &config.temperature)?,
            pressure: registry.resolve(object, &config.pressure)?,
            mole_fractions: registry.resolve_all(object, &config.mole_fractions)?,
            species: config.species.clone(),
            gas_constant: config.gas_constant,
        })
    }

    /// Number of species.
    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    /// Species data.
    pub fn species(&self) -> &[GasSpecies] {
        &self.species
    }

    /// Gas constant in use.
    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }

    /// Temperature at one point.
    pub fn temperature<S: FieldSource>(&self, source: &S) -> f64 {
        self.temperature.value(source)
    }

    /// Pressure at one point.
    pub fn pressure<S: FieldSource>(&self, source: &S) -> Pressure {
        Pressure::from_kilopascals(self.pressure.value(source))
    }

    /// Molar mass of one species.
    pub fn species_molar_mass(&self, species: usize) -> MolarMass {
        MolarMass::from_grams_per_mole(self.species[species].molar_mass)
    }

    /// Sutherland viscosity of one species.
    pub fn species_viscosity(&self, species: usize, temperature: f64) -> Viscosity {
        let s = &self.species[species];
        let mu = s.sutherland_viscosity
            * (temperature / s.sutherland_temperature).powf(1.5)
            * (s.sutherland_temperature + s.sutherland_constant)
            / (temperature + s.sutherland_constant);
        Viscosity::from_pascal_seconds(mu)
    }

    /// Fuller binary diffusivity between species `i` and `j`.
    pub fn binary_diffusivity(&self, i: usize, j: usize, temperature: f64, pressure: Pressure) -> Diffusivity {
        let a = &self.species[i];
        let b = &self.species[j];
        let m_ij = 2.0 / (1.0 / a.molar_mass + 1.0 / b.molar_mass);
        let volumes = a.diffusion_volume.cbrt() + b.diffusion_volume.cbrt();
        let d = FULLER_PREFACTOR * temperature.powf(1.75)
            / (pressure.atmospheres() * m_ij.sqrt() * volumes * volumes);
        Diffusivity::from_cm2_per_s(d)
    }

    /// Wilke mixture-averaged diffusivity of one species.
    ///
    /// Falls back to the self-diffusivity when no other species is present.
    pub fn molecular_diffusivity<S: FieldSource>(&self, source: &S, species: usize) -> Diffusivity {
        let t = self.temperature(source);
        let p = self.pressure(source);
        let y_i = self.mole_fractions[species].value(source);

        let mut denominator = 0.0;
        for (j, y) in self.mole_fractions.iter().enumerate() {
            if j == species {
                continue;
            }
            let d_ij = self.binary_diffusivity(species, j, t, p).m2_per_s();
            denominator += y.value(source) / d_ij;
        }
        if denominator <= 0.0 {
            return self.binary_diffusivity(species, species, t, p);
        }
        Diffusivity::from_m2_per_s((1.0 - y_i) / denominator)
    }
}

impl Material for SimpleGasProperties {
    type Properties = GasProperties;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_properties<S: FieldSource>(&self, source: &S) -> GasProperties {
        let t = self.temperature(source);
        let p = self.pressure(source);

        let mut mean_mass = 0.0;
        let mut mu_num = 0.0;
        let mut mu_den = 0.0;
        let mut conductivity = 0.0;
        for (i, (y, s)) in self.mole_fractions.iter().zip(&self.species).enumerate() {
            let y = y.value(source);
            let m = self.species_molar_mass(i).kilograms_per_mole();
            let mu = self.species_viscosity(i, t).pascal_seconds();
            let sqrt_m = s.molar_mass.sqrt();

            mean_mass += y * m;
            mu_num += y * mu * sqrt_m;
            mu_den += y * sqrt_m;
            conductivity += y * mu * (s.heat_capacity + 1.25 * self.gas_constant / m);
        }

        let mut heat_capacity = 0.0;
        if mean_mass > 0.0 {
            for (i, (y, s)) in self.mole_fractions.iter().zip(&self.species).enumerate() {
                let w = y.value(source) * self.species_molar_mass(i).kilograms_per_mole() / mean_mass;
                heat_capacity += w * s.heat_capacity;
            }
        }

        let viscosity = if mu_den > 0.0 { mu_num / mu_den } else { 0.0 };

        GasProperties {
            temperature: t,
            pressure: p,
            molar_mass: MolarMass::from_kilograms_per_mole(mean_mass),
            density: p.pascals() * mean_mass / (self.gas_constant * t),
            viscosity: Viscosity::from_pascal_seconds(viscosity),
            heat_capacity,
            thermal_conductivity: conductivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{AuxContext, FieldValue};

    fn air_co2_config() -> SimpleGasConfig {
        SimpleGasConfig {
            temperature: "T".into(),
            pressure: CoupledInput::Constant(101.325),
            mole_fractions: vec!["y_n2".into(), "y_co2".into()],
            species: vec![
                GasSpecies {
                    molar_mass: 28.014,
                    sutherland_viscosity: 1.663e-5,
                    sutherland_temperature: 273.15,
                    sutherland_constant: 107.0,
                    diffusion_volume: 18.5,
                    heat_capacity: 1040.0,
                },
                GasSpecies {
                    molar_mass: 44.01,
                    sutherland_viscosity: 1.37e-5,
                    sutherland_temperature: 273.15,
                    sutherland_constant: 222.0,
                    diffusion_volume: 26.7,
                    heat_capacity: 844.0,
                },
            ],
            gas_constant: crate::constants::GAS_CONSTANT,
        }
    }

    #[test]
    fn test_pure_nitrogen_density() {
        let reg = FieldRegistry::with_fields(["T", "y_n2", "y_co2"]);
        let gas = SimpleGasProperties::new(&air_co2_config(), &reg).unwrap();
        let fields = [FieldValue::new(300.0), FieldValue::new(1.0), FieldValue::new(0.0)];
        let props = gas.compute_properties(&AuxContext::new(&fields));

        let expected = 101_325.0 * 0.028014 / (crate::constants::GAS_CONSTANT * 300.0);
        assert!((props.density - expected).abs() < 1e-10);
        assert!((props.heat_capacity - 1040.0).abs() < 1e-10);
        assert!((props.molar_mass.grams_per_mole() - 28.014).abs() < 1e-9);
    }

    #[test]
    fn test_sutherland_reference_point() {
        let reg = FieldRegistry::with_fields(["T", "y_n2", "y_co2"]);
        let gas = SimpleGasProperties::new(&air_co2_config(), &reg).unwrap();
        let mu = gas.species_viscosity(0, 273.15);
        assert!((mu.pascal_seconds() - 1.663e-5).abs() < 1e-18);
    }

    #[test]
    fn test_fuller_magnitude() {
        // N2–CO2 at 300 K and 1 atm is about 0.16 cm²/s
        let reg = FieldRegistry::with_fields(["T", "y_n2", "y_co2"]);
        let gas = SimpleGasProperties::new(&air_co2_config(), &reg).unwrap();
        let d = gas.binary_diffusivity(0, 1, 300.0, Pressure::from_kilopascals(101.325));
        assert!(d.cm2_per_s() > 0.1 && d.cm2_per_s() < 0.25);
    }

    #[test]
    fn test_wilke_binary_limit() {
        // In a binary mixture the Wilke average reduces to D_12
        let reg = FieldRegistry::with_fields(["T", "y_n2", "y_co2"]);
        let gas = SimpleGasProperties::new(&air_co2_config(), &reg).unwrap();
        let fields = [FieldValue::new(350.0), FieldValue::new(0.7), FieldValue::new(0.3)];
        let ctx = AuxContext::new(&fields);
        let d_mix = gas.molecular_diffusivity(&ctx, 1).m2_per_s();
        let d_12 = gas
            .binary_diffusivity(1, 0, 350.0, Pressure::from_kilopascals(101.325))
            .m2_per_s();
        assert!((d_mix - d_12).abs() < 1e-12 * d_12.abs().max(1.0));
    }

    #[test]
    fn test_species_mismatch() {
        let reg = FieldRegistry::with_fields(["T", "y_n2", "y_co2"]);
        let mut cfg = air_co2_config();
        cfg.mole_fractions.pop();
        assert!(SimpleGasProperties::new(&cfg, &reg).is_err());
    }
}
