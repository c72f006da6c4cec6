//! Porous-media coefficient evaluators.
//!
//! Darcy-type coefficients divide by (μ + 1e-15) so a zero viscosity field
//! never divides by zero:
//!
//! - Kozeny–Carman: K = d_p²·ε³ / (C_KC·(1 − ε)²·μ)
//! - Darcy–Weisbach (laminar channel): K = 2·d_h² / (fRe·μ)
//! - Schlögl pressure: K_p = k_p/μ
//! - Schlögl electrokinetic: K_φ = k_φ·z·c_f·F/μ
//!
//! Renkin hindered diffusion, with λ = r_s/r_p clamped to [0, 1]:
//!
//! D_h = D·(1 − λ)²·(1 − 2.104λ + 2.09λ³ − 0.95λ⁵)

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{default_faraday, VISCOSITY_FLOOR};
use crate::error::Result;
use crate::params::{self, check_positive, Coupled, CoupledInput, FieldRegistry};
use crate::term::{AuxContext, AuxKernel};
use crate::types::FieldId;

#[inline]
fn floored(viscosity: f64) -> f64 {
    viscosity + VISCOSITY_FLOOR
}

// =============================================================================
// Darcy-type coefficients
// =============================================================================

/// `KozenyCarmanDarcyCoefficient`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KozenyCarmanConfig {
    pub variable: String,
    pub porosity: CoupledInput,
    pub viscosity: CoupledInput,
    /// Particle diameter (m)
    pub particle_diameter: CoupledInput,
    #[serde(default = "default_kozeny_carman")]
    pub kozeny_carman_const: f64,
}

fn default_kozeny_carman() -> f64 {
    180.0
}

/// `DarcyWeisbachCoefficient`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DarcyWeisbachConfig {
    pub variable: String,
    pub viscosity: CoupledInput,
    /// Hydraulic diameter (m)
    pub hydraulic_diameter: CoupledInput,
    /// Product of friction factor and Reynolds number (64 for round channels)
    #[serde(default = "default_friction_reynolds")]
    pub friction_reynolds: f64,
}

fn default_friction_reynolds() -> f64 {
    64.0
}

/// `SchloeglDarcyCoefficient`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchloeglDarcyConfig {
    pub variable: String,
    pub viscosity: CoupledInput,
    /// Hydraulic permeability k_p (m²)
    pub hydraulic_permeability: CoupledInput,
}

/// `SchloeglElectrokineticCoefficient`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchloeglElectrokineticConfig {
    pub variable: String,
    pub viscosity: CoupledInput,
    /// Electrokinetic permeability k_φ (m²)
    pub electrokinetic_permeability: CoupledInput,
    /// Fixed-charge concentration c_f (mol/m³)
    pub fixed_charge: CoupledInput,
    #[serde(default = "params::one_f64")]
    pub fixed_valence: f64,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
}

/// Velocity coefficient divided by a floored viscosity.
#[derive(Clone, Debug)]
pub struct DarcyCoefficient {
    name: &'static str,
    variable: FieldId,
    viscosity: Coupled,
    law: DarcyLaw,
}

#[derive(Clone, Copy, Debug)]
enum DarcyLaw {
    KozenyCarman {
        porosity: Coupled,
        diameter: Coupled,
        constant: f64,
    },
    DarcyWeisbach {
        diameter: Coupled,
        friction_reynolds: f64,
    },
    Permeability {
        permeability: Coupled,
        scale: f64,
        charge: Coupled,
    },
}

impl DarcyCoefficient {
    pub fn kozeny_carman(config: KozenyCarmanConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "KozenyCarmanDarcyCoefficient";
        check_positive(NAME, "kozeny_carman_const", config.kozeny_carman_const)?;
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            viscosity: registry.resolve(NAME, &config.viscosity)?,
            law: DarcyLaw::KozenyCarman {
                porosity: registry.resolve(NAME, &config.porosity)?,
                diameter: registry.resolve(NAME, &config.particle_diameter)?,
                constant: config.kozeny_carman_const,
            },
        })
    }

    pub fn darcy_weisbach(config: DarcyWeisbachConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "DarcyWeisbachCoefficient";
        check_positive(NAME, "friction_reynolds", config.friction_reynolds)?;
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            viscosity: registry.resolve(NAME, &config.viscosity)?,
            law: DarcyLaw::DarcyWeisbach {
                diameter: registry.resolve(NAME, &config.hydraulic_diameter)?,
                friction_reynolds: config.friction_reynolds,
            },
        })
    }

    pub fn schloegl_darcy(config: SchloeglDarcyConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "SchloeglDarcyCoefficient";
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            viscosity: registry.resolve(NAME, &config.viscosity)?,
            law: DarcyLaw::Permeability {
                permeability: registry.resolve(NAME, &config.hydraulic_permeability)?,
                scale: 1.0,
                charge: Coupled::Constant(1.0),
            },
        })
    }

    pub fn schloegl_electrokinetic(
        config: SchloeglElectrokineticConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "SchloeglElectrokineticCoefficient";
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            viscosity: registry.resolve(NAME, &config.viscosity)?,
            law: DarcyLaw::Permeability {
                permeability: registry.resolve(NAME, &config.electrokinetic_permeability)?,
                scale: config.fixed_valence * config.faraday,
                charge: registry.resolve(NAME, &config.fixed_charge)?,
            },
        })
    }
}

impl AuxKernel for DarcyCoefficient {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let mu = floored(self.viscosity.value(ctx));
        match self.law {
            DarcyLaw::KozenyCarman {
                porosity,
                diameter,
                constant,
            } => {
                let eps = porosity.value(ctx);
                let d = diameter.value(ctx);
                let solids = 1.0 - eps;
                d * d * eps.powi(3) / (constant * solids * solids * mu)
            }
            DarcyLaw::DarcyWeisbach {
                diameter,
                friction_reynolds,
            } => {
                let d = diameter.value(ctx);
                2.0 * d * d / (friction_reynolds * mu)
            }
            DarcyLaw::Permeability {
                permeability,
                scale,
                charge,
            } => scale * charge.value(ctx) * permeability.value(ctx) / mu,
        }
    }
}

// =============================================================================
// Diffusivities and velocities
// =============================================================================

/// `HinderedDiffusivity`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HinderedDiffusivityConfig {
    pub variable: String,
    /// Bulk diffusivity
    pub diffusivity: CoupledInput,
    pub solute_radius: CoupledInput,
    pub pore_radius: CoupledInput,
}

/// Renkin wall factor applied to a bulk diffusivity.
#[derive(Debug)]
pub struct HinderedDiffusivity {
    variable: FieldId,
    diffusivity: Coupled,
    solute_radius: Coupled,
    pore_radius: Coupled,
    clamp_warned: AtomicBool,
}

impl HinderedDiffusivity {
    const NAME: &'static str = "HinderedDiffusivity";

    pub fn new(config: HinderedDiffusivityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            diffusivity: registry.resolve(Self::NAME, &config.diffusivity)?,
            solute_radius: registry.resolve(Self::NAME, &config.solute_radius)?,
            pore_radius: registry.resolve(Self::NAME, &config.pore_radius)?,
            clamp_warned: AtomicBool::new(false),
        })
    }
}

/// Renkin hindrance factor for a radius ratio already in [0, 1].
pub fn renkin_factor(lambda: f64) -> f64 {
    let open = 1.0 - lambda;
    open * open * (1.0 - 2.104 * lambda + 2.09 * lambda.powi(3) - 0.95 * lambda.powi(5))
}

impl AuxKernel for HinderedDiffusivity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let ratio = self.solute_radius.value(ctx) / self.pore_radius.value(ctx);
        let lambda = if ratio.is_nan() { 1.0 } else { ratio.clamp(0.0, 1.0) };
        if lambda != ratio && !self.clamp_warned.swap(true, Ordering::Relaxed) {
            warn!("{}: radius ratio {ratio} clamped to {lambda}", Self::NAME);
        }
        self.diffusivity.value(ctx) * renkin_factor(lambda)
    }
}

/// `EffectiveDiffusivity`: D·ε/τ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectiveDiffusivityConfig {
    pub variable: String,
    pub diffusivity: CoupledInput,
    pub porosity: CoupledInput,
    #[serde(default = "params::one")]
    pub tortuosity: CoupledInput,
}

#[derive(Clone, Debug)]
pub struct EffectiveDiffusivity {
    variable: FieldId,
    diffusivity: Coupled,
    porosity: Coupled,
    tortuosity: Coupled,
}

impl EffectiveDiffusivity {
    const NAME: &'static str = "EffectiveDiffusivity";

    pub fn new(config: EffectiveDiffusivityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            diffusivity: registry.resolve(Self::NAME, &config.diffusivity)?,
            porosity: registry.resolve(Self::NAME, &config.porosity)?,
            tortuosity: registry.resolve(Self::NAME, &config.tortuosity)?,
        })
    }
}

impl AuxKernel for EffectiveDiffusivity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.diffusivity.value(ctx) * self.porosity.value(ctx) / self.tortuosity.value(ctx)
    }
}

/// `AverageLinearVelocity`: |v|/ε
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AverageLinearVelocityConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
    pub porosity: CoupledInput,
}

/// Interstitial speed from a superficial velocity.
#[derive(Clone, Debug)]
pub struct AverageLinearVelocity {
    variable: FieldId,
    velocity: [Coupled; 3],
    porosity: Coupled,
}

impl AverageLinearVelocity {
    const NAME: &'static str = "AverageLinearVelocity";

    pub fn new(config: AverageLinearVelocityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            velocity: [
                registry.resolve(Self::NAME, &config.ux)?,
                registry.resolve(Self::NAME, &config.uy)?,
                registry.resolve(Self::NAME, &config.uz)?,
            ],
            porosity: registry.resolve(Self::NAME, &config.porosity)?,
        })
    }
}

impl AuxKernel for AverageLinearVelocity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let speed = self
            .velocity
            .iter()
            .map(|c| c.value(ctx).powi(2))
            .sum::<f64>()
            .sqrt();
        speed / self.porosity.value(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FARADAY;
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["aux", "mu", "eps", "d"])
    }

    #[test]
    fn test_kozeny_carman() {
        let aux = DarcyCoefficient::kozeny_carman(
            KozenyCarmanConfig {
                variable: "aux".into(),
                porosity: "eps".into(),
                viscosity: "mu".into(),
                particle_diameter: "d".into(),
                kozeny_carman_const: 180.0,
            },
            &registry(),
        )
        .unwrap();
        let f = [
            FieldValue::new(0.0),
            FieldValue::new(1.0e-3),
            FieldValue::new(0.5),
            FieldValue::new(1.0e-3),
        ];
        let expected = 1.0e-6 * 0.125 / (180.0 * 0.25 * (1.0e-3 + 1e-15));
        assert!((aux.compute_value(&AuxContext::new(&f)) - expected).abs() < TOL);
    }

    #[test]
    fn test_zero_viscosity_is_floored() {
        let aux = DarcyCoefficient::schloegl_darcy(
            SchloeglDarcyConfig {
                variable: "aux".into(),
                viscosity: "mu".into(),
                hydraulic_permeability: CoupledInput::Constant(1.0e-18),
            },
            &registry(),
        )
        .unwrap();
        let f = [FieldValue::new(0.0); 4];
        let k = aux.compute_value(&AuxContext::new(&f));
        assert!(k.is_finite());
        assert!((k - 1.0e-18 / 1e-15).abs() < TOL);
    }

    #[test]
    fn test_darcy_weisbach_laminar() {
        let aux = DarcyCoefficient::darcy_weisbach(
            DarcyWeisbachConfig {
                variable: "aux".into(),
                viscosity: CoupledInput::Constant(2.0e-3),
                hydraulic_diameter: CoupledInput::Constant(1.0e-3),
                friction_reynolds: 64.0,
            },
            &registry(),
        )
        .unwrap();
        let f = [FieldValue::new(0.0); 4];
        let expected = 1.0e-6 / (32.0 * (2.0e-3 + 1e-15));
        assert!((aux.compute_value(&AuxContext::new(&f)) - expected).abs() < TOL);
    }

    #[test]
    fn test_schloegl_electrokinetic() {
        let aux = DarcyCoefficient::schloegl_electrokinetic(
            SchloeglElectrokineticConfig {
                variable: "aux".into(),
                viscosity: CoupledInput::Constant(1.0e-3),
                electrokinetic_permeability: CoupledInput::Constant(1.0e-19),
                fixed_charge: CoupledInput::Constant(1200.0),
                fixed_valence: -1.0,
                faraday: FARADAY,
            },
            &registry(),
        )
        .unwrap();
        let f = [FieldValue::new(0.0); 4];
        let expected = -FARADAY * 1200.0 * 1.0e-19 / (1.0e-3 + 1e-15);
        let value = aux.compute_value(&AuxContext::new(&f));
        assert!((value - expected).abs() < 1e-9 * expected.abs());
    }

    #[test]
    fn test_renkin_limits() {
        assert!((renkin_factor(0.0) - 1.0).abs() < TOL);
        assert!(renkin_factor(1.0).abs() < TOL);
    }

    #[test]
    fn test_hindered_diffusivity_clamps_ratio() {
        let aux = HinderedDiffusivity::new(
            HinderedDiffusivityConfig {
                variable: "aux".into(),
                diffusivity: CoupledInput::Constant(2.0e-9),
                solute_radius: "d".into(),
                pore_radius: CoupledInput::Constant(1.0),
            },
            &registry(),
        )
        .unwrap();
        let too_big = [
            FieldValue::new(0.0),
            FieldValue::new(0.0),
            FieldValue::new(0.0),
            FieldValue::new(3.0),
        ];
        assert!(aux.compute_value(&AuxContext::new(&too_big)).abs() < TOL);
        assert!(aux.clamp_warned.load(Ordering::Relaxed));

        let negative = [
            FieldValue::new(0.0),
            FieldValue::new(0.0),
            FieldValue::new(0.0),
            FieldValue::new(-0.5),
        ];
        assert!((aux.compute_value(&AuxContext::new(&negative)) - 2.0e-9).abs() < TOL);
    }

    #[test]
    fn test_effective_diffusivity_and_velocity() {
        let reg = registry();
        let f = [
            FieldValue::new(0.0),
            FieldValue::new(0.0),
            FieldValue::new(0.4),
            FieldValue::new(3.0),
        ];
        let ctx = AuxContext::new(&f);

        let eff = EffectiveDiffusivity::new(
            EffectiveDiffusivityConfig {
                variable: "aux".into(),
                diffusivity: "d".into(),
                porosity: "eps".into(),
                tortuosity: CoupledInput::Constant(2.0),
            },
            &reg,
        )
        .unwrap();
        assert!((eff.compute_value(&ctx) - 0.6).abs() < TOL);

        let alv = AverageLinearVelocity::new(
            AverageLinearVelocityConfig {
                variable: "aux".into(),
                ux: CoupledInput::Constant(0.3),
                uy: CoupledInput::Constant(0.4),
                uz: CoupledInput::Constant(0.0),
                porosity: "eps".into(),
            },
            &reg,
        )
        .unwrap();
        assert!((alv.compute_value(&ctx) - 1.25).abs() < TOL);
    }
}
