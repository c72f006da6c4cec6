//! Electrolyte properties from a list of ions.
//!
//! Conductivity (dilute-solution Nernst–Einstein):
//!
//! σ = F²/(R·T) · Σ zᵢ²·Dᵢ·Cᵢ + σ_min
//!
//! Ionic strength (concentrations converted to mol/L):
//!
//! I = ½ Σ zᵢ²·Cᵢ
//!
//! Davies activity coefficient:
//!
//! log₁₀ γ = −A·z²·(√I/(1 + √I) − 0.3·I)

use crate::error::Result;
use crate::params::{check_lengths, Coupled, CoupledInput, FieldRegistry};
use crate::term::FieldSource;
use crate::types::{Concentration, FieldId};

/// Davies constant A for water near 25 °C.
pub const DAVIES_A: f64 = 0.509;

/// Parallel lists of ion concentrations, valences, and diffusivities.
#[derive(Clone, Debug)]
pub struct IonSet {
    concentrations: Vec<Coupled>,
    valences: Vec<f64>,
    diffusivities: Vec<Coupled>,
}

impl IonSet {
    /// Resolve ion lists. `diffusivities` may be empty when only valences
    /// are needed (ionic strength, activity).
    pub fn from_inputs(
        object: &'static str,
        concentrations: &[CoupledInput],
        valences: &[f64],
        diffusivities: &[CoupledInput],
        registry: &FieldRegistry,
    ) -> Result<Self> {
        check_lengths(
            object,
            "ion_conc",
            concentrations.len(),
            "ion_valence",
            valences.len(),
        )?;
        if !diffusivities.is_empty() {
            check_lengths(
                object,
                "ion_conc",
                concentrations.len(),
                "diffusion",
                diffusivities.len(),
            )?;
        }
        Ok(Self {
            concentrations: registry.resolve_all(object, concentrations)?,
            valences: valences.to_vec(),
            diffusivities: registry.resolve_all(object, diffusivities)?,
        })
    }

    /// Number of ions.
    pub fn len(&self) -> usize {
        self.concentrations.len()
    }

    /// Whether there are no ions.
    pub fn is_empty(&self) -> bool {
        self.concentrations.is_empty()
    }

    /// Concentration inputs.
    pub fn concentrations(&self) -> &[Coupled] {
        &self.concentrations
    }

    /// Valences.
    pub fn valences(&self) -> &[f64] {
        &self.valences
    }

    /// Diffusivity inputs (empty when not configured).
    pub fn diffusivities(&self) -> &[Coupled] {
        &self.diffusivities
    }

    /// Σ zᵢ²·Dᵢ·Cᵢ
    pub fn conduction_sum<S: FieldSource>(&self, source: &S) -> f64 {
        self.concentrations
            .iter()
            .zip(&self.valences)
            .zip(&self.diffusivities)
            .map(|((c, z), d)| z * z * d.value(source) * c.value(source))
            .sum()
    }

    /// Derivative of [`Self::conduction_sum`] with respect to `wrt`.
    pub fn conduction_sum_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        self.concentrations
            .iter()
            .zip(&self.valences)
            .zip(&self.diffusivities)
            .map(|((c, z), d)| {
                z * z * (d.indicator(wrt) * c.value(source) + d.value(source) * c.indicator(wrt))
            })
            .sum()
    }

    /// Ionic strength in mol/L, from concentrations in mol/m³.
    pub fn ionic_strength<S: FieldSource>(&self, source: &S) -> f64 {
        0.5 * self
            .concentrations
            .iter()
            .zip(&self.valences)
            .map(|(c, z)| z * z * Concentration::from_mol_per_m3(c.value(source)).mol_per_liter())
            .sum::<f64>()
    }

    /// Every coupled input.
    pub fn inputs(&self) -> Vec<Coupled> {
        self.concentrations
            .iter()
            .chain(&self.diffusivities)
            .copied()
            .collect()
    }
}

/// Davies activity coefficient for valence `z` at ionic strength `ionic_strength` (mol/L).
pub fn davies_activity_coefficient(z: f64, ionic_strength: f64) -> f64 {
    let sqrt_i = ionic_strength.max(0.0).sqrt();
    let log_gamma = -DAVIES_A * z * z * (sqrt_i / (1.0 + sqrt_i) - 0.3 * ionic_strength);
    10f64.powf(log_gamma)
}
