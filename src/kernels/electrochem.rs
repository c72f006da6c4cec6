//! Electrochemistry kernels.
//!
//! Algebraic constraints (rate, current density, activity) share their
//! relation with the matching initial condition in `ics`; the PDE-style
//! potential conductivity kernels live in `diffusion`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::default_faraday;
use crate::electrochem::{
    ButlerVolmer, ButlerVolmerRateConfig, CurrentDensity, CurrentDensityConfig, IonSet,
};
use crate::error::Result;
use crate::params::{
    self, check_lengths, check_positive, collect_coupled, Coupled, CoupledInput, FieldRegistry,
};
use crate::term::{FieldSource, Kernel, QpContext};
use crate::types::FieldId;

use super::porous::{DirectionalFluxConstraint, GradientTerm};

#[inline]
fn own(variable: FieldId, wrt: FieldId) -> f64 {
    if wrt == variable {
        1.0
    } else {
        0.0
    }
}

// =============================================================================
// Butler–Volmer
// =============================================================================

/// Butler–Volmer rate variable: R = ψ·(u − r(η, C, T)).
#[derive(Clone, Debug)]
pub struct ButlerVolmerRate {
    variable: FieldId,
    kinetics: ButlerVolmer,
}

impl ButlerVolmerRate {
    const NAME: &'static str = "ButlerVolmerRate";

    pub fn new(config: ButlerVolmerRateConfig, registry: &FieldRegistry) -> Result<Self> {
        let variable = registry.resolve_field(Self::NAME, &config.variable)?;
        let kinetics = ButlerVolmer::from_config(Self::NAME, &config, registry)?;
        debug!("{}: variable {variable}", Self::NAME);
        Ok(Self { variable, kinetics })
    }
}

impl Kernel for ButlerVolmerRate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - self.kinetics.rate(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.compute_qp_off_diag_jacobian(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        ctx.test * ctx.phi * (own(self.variable, jvar) - self.kinetics.rate_derivative(ctx, jvar))
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.kinetics.inputs().iter())
    }
}

/// Butler–Volmer current density: R = ψ·(u − n·F·a·(−r)).
#[derive(Clone, Debug)]
pub struct ButlerVolmerCurrentDensity {
    variable: FieldId,
    current: CurrentDensity,
}

impl ButlerVolmerCurrentDensity {
    const NAME: &'static str = "ButlerVolmerCurrentDensity";

    pub fn new(config: CurrentDensityConfig, registry: &FieldRegistry) -> Result<Self> {
        let variable = registry.resolve_field(Self::NAME, &config.variable)?;
        let current = CurrentDensity::from_config(Self::NAME, &config, registry)?;
        Ok(Self { variable, current })
    }
}

impl Kernel for ButlerVolmerCurrentDensity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - self.current.value(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.compute_qp_off_diag_jacobian(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        ctx.test * ctx.phi * (own(self.variable, jvar) - self.current.derivative(ctx, jvar))
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.current.inputs().iter())
    }
}

// =============================================================================
// Current from potential gradients
// =============================================================================

/// `ElectrodeCurrentFromPotentialGrad`: J_dir = −ε_s·σ·∂Φ_s/∂x_dir
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElectrodeCurrentConfig {
    pub variable: String,
    pub electric_potential: String,
    #[serde(default = "params::one")]
    pub solid_frac: CoupledInput,
    #[serde(default = "default_electrode_conductivity")]
    pub conductivity: CoupledInput,
    pub direction: usize,
}

pub(crate) fn default_electrode_conductivity() -> CoupledInput {
    CoupledInput::Constant(50.0)
}

/// `ElectrolyteCurrentFromPotentialGrad`:
/// J_dir = −σ_e·∂Φ_e/∂x_dir − F·Σ zᵢ·Dᵢ·∂Cᵢ/∂x_dir
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElectrolyteCurrentConfig {
    pub variable: String,
    pub electric_potential: String,
    #[serde(default = "params::one")]
    pub conductivity: CoupledInput,
    #[serde(default)]
    pub ion_conc: Vec<CoupledInput>,
    #[serde(default)]
    pub ion_valence: Vec<f64>,
    #[serde(default)]
    pub diffusion: Vec<CoupledInput>,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
    pub direction: usize,
}

impl DirectionalFluxConstraint {
    pub fn electrode_current(config: ElectrodeCurrentConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "ElectrodeCurrentFromPotentialGrad";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let terms = vec![GradientTerm {
            coefficient: 1.0,
            factors: vec![
                registry.resolve(NAME, &config.solid_frac)?,
                registry.resolve(NAME, &config.conductivity)?,
            ],
            potential: Coupled::Field(registry.resolve_field(NAME, &config.electric_potential)?),
        }];
        Self::from_parts(NAME, u, config.direction, terms)
    }

    pub fn electrolyte_current(
        config: ElectrolyteCurrentConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "ElectrolyteCurrentFromPotentialGrad";
        let u = registry.resolve_field(NAME, &config.variable)?;
        // Every ion needs a diffusivity here, unlike the ionic-strength users.
        check_lengths(
            NAME,
            "ion_conc",
            config.ion_conc.len(),
            "diffusion",
            config.diffusion.len(),
        )?;
        let ions = IonSet::from_inputs(
            NAME,
            &config.ion_conc,
            &config.ion_valence,
            &config.diffusion,
            registry,
        )?;

        let mut terms = vec![GradientTerm {
            coefficient: 1.0,
            factors: vec![registry.resolve(NAME, &config.conductivity)?],
            potential: Coupled::Field(registry.resolve_field(NAME, &config.electric_potential)?),
        }];
        for ((c, z), d) in ions
            .concentrations()
            .iter()
            .zip(ions.valences())
            .zip(ions.diffusivities())
        {
            terms.push(GradientTerm {
                coefficient: config.faraday * z,
                factors: vec![*d],
                potential: *c,
            });
        }
        Self::from_parts(NAME, u, config.direction, terms)
    }
}

// =============================================================================
// Ohmic heating
// =============================================================================

/// `ElectrodeOhmicHeating`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElectrodeOhmicHeatingConfig {
    pub variable: String,
    pub electric_potential: String,
    #[serde(default = "params::one")]
    pub solid_frac: CoupledInput,
    #[serde(default = "default_electrode_conductivity")]
    pub conductivity: CoupledInput,
}

/// Joule heating: R = −ψ·ε_s·σ·|∇Φ|².
///
/// The derivative with respect to Φ is −ψ·ε_s·σ·2·∇Φ·∇φ.
#[derive(Clone, Debug)]
pub struct ElectrodeOhmicHeating {
    variable: FieldId,
    potential: FieldId,
    solid_frac: Coupled,
    conductivity: Coupled,
}

impl ElectrodeOhmicHeating {
    const NAME: &'static str = "ElectrodeOhmicHeating";

    pub fn new(config: ElectrodeOhmicHeatingConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        Ok(Self {
            variable: registry.resolve_field(object, &config.variable)?,
            potential: registry.resolve_field(object, &config.electric_potential)?,
            solid_frac: registry.resolve(object, &config.solid_frac)?,
            conductivity: registry.resolve(object, &config.conductivity)?,
        })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let grad = ctx.fields[self.potential].gradient;
        let eps = self.solid_frac.value(ctx);
        let sigma = self.conductivity.value(ctx);

        let mut d = (self.solid_frac.indicator(wrt) * sigma + eps * self.conductivity.indicator(wrt))
            * ctx.phi
            * grad.norm_squared();
        if wrt == self.potential {
            d += eps * sigma * 2.0 * grad.dot(&ctx.grad_phi);
        }
        -ctx.test * d
    }
}

impl Kernel for ElectrodeOhmicHeating {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let grad = ctx.fields[self.potential].gradient;
        -ctx.test * self.solid_frac.value(ctx) * self.conductivity.value(ctx) * grad.norm_squared()
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let potential = Coupled::Field(self.potential);
        collect_coupled(
            self.variable,
            [&self.solid_frac, &self.conductivity, &potential],
        )
    }
}

// =============================================================================
// Activity
// =============================================================================

/// Configuration shared by `ActivityConstraint` and `ActivityIC`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub activity_coeff: CoupledInput,
    pub concentration: CoupledInput,
    /// Reference concentration C_ref
    #[serde(default = "params::one_f64")]
    pub ref_conc: f64,
}

/// Activity a = γ·C/C_ref.
#[derive(Clone, Copy, Debug)]
pub struct Activity {
    activity_coeff: Coupled,
    concentration: Coupled,
    ref_conc: f64,
}

impl Activity {
    pub fn from_config(
        object: &'static str,
        config: &ActivityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        check_positive(object, "ref_conc", config.ref_conc)?;
        Ok(Self {
            activity_coeff: registry.resolve(object, &config.activity_coeff)?,
            concentration: registry.resolve(object, &config.concentration)?,
            ref_conc: config.ref_conc,
        })
    }

    #[inline]
    pub fn value<S: FieldSource>(&self, source: &S) -> f64 {
        self.activity_coeff.value(source) * self.concentration.value(source) / self.ref_conc
    }

    pub fn derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        (self.activity_coeff.indicator(wrt) * self.concentration.value(source)
            + self.activity_coeff.value(source) * self.concentration.indicator(wrt))
            / self.ref_conc
    }

    pub fn inputs(&self) -> [Coupled; 2] {
        [self.activity_coeff, self.concentration]
    }
}

/// Activity constraint: R = ψ·(u − γ·C/C_ref).
#[derive(Clone, Debug)]
pub struct ActivityConstraint {
    variable: FieldId,
    activity: Activity,
}

impl ActivityConstraint {
    const NAME: &'static str = "ActivityConstraint";

    pub fn new(config: ActivityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            activity: Activity::from_config(Self::NAME, &config, registry)?,
        })
    }
}

impl Kernel for ActivityConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - self.activity.value(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.compute_qp_off_diag_jacobian(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        ctx.test * ctx.phi * (own(self.variable, jvar) - self.activity.derivative(ctx, jvar))
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.activity.inputs().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FARADAY, GAS_CONSTANT};
    use crate::kernels::testing::{assert_jacobian, qp};
    use crate::term::FieldValue;
    use nalgebra::Vector3;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields([
            "u", "phi_s", "phi_e", "T", "ox", "red", "a", "sigma", "eps", "c1", "c2", "d1",
        ])
    }

    fn fields() -> [FieldValue; 12] {
        [
            FieldValue::new(0.2),
            FieldValue::new(0.45).with_gradient(Vector3::new(1.2, -0.4, 0.3)),
            FieldValue::new(0.3).with_gradient(Vector3::new(-0.2, 0.6, 0.1)),
            FieldValue::new(305.0),
            FieldValue::new(1.2),
            FieldValue::new(0.7),
            FieldValue::new(2.5),
            FieldValue::new(30.0),
            FieldValue::new(0.6),
            FieldValue::new(10.0).with_gradient(Vector3::new(0.5, 1.0, -2.0)),
            FieldValue::new(5.0).with_gradient(Vector3::new(-1.0, 0.2, 0.4)),
            FieldValue::new(1.0e-3),
        ]
    }

    #[test]
    fn test_butler_volmer_rate_jacobian() {
        let k = ButlerVolmerRate::new(
            ButlerVolmerRateConfig {
                variable: "u".into(),
                oxidation_rate: 1.5,
                reduction_rate: 0.8,
                alpha: 0.45,
                electrons: 1.0,
                reference_potential: 0.12,
                faraday: FARADAY,
                gas_constant: GAS_CONSTANT,
                electrode_potential: "phi_s".into(),
                electrolyte_potential: "phi_e".into(),
                temperature: "T".into(),
                oxidants: vec!["ox".into()],
                oxidant_stoich: vec![1.0],
                reductants: vec!["red".into()],
                reductant_stoich: vec![1.0],
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        assert_jacobian(&k, &qp(&f));
    }

    #[test]
    fn test_current_density_jacobian() {
        let k = ButlerVolmerCurrentDensity::new(
            CurrentDensityConfig {
                variable: "u".into(),
                rate: "red".into(),
                specific_area: "a".into(),
                electrons: 2.0,
                faraday: FARADAY,
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        let expected = ctx.test * (0.2 - 2.0 * FARADAY * 2.5 * -0.7);
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < 1e-9);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_electrode_current() {
        let k = DirectionalFluxConstraint::electrode_current(
            ElectrodeCurrentConfig {
                variable: "u".into(),
                electric_potential: "phi_s".into(),
                solid_frac: "eps".into(),
                conductivity: "sigma".into(),
                direction: 0,
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        // J_x = −0.6·30·1.2
        let expected = ctx.test * (0.2 + 0.6 * 30.0 * 1.2);
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < 1e-10);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_electrolyte_current() {
        let k = DirectionalFluxConstraint::electrolyte_current(
            ElectrolyteCurrentConfig {
                variable: "u".into(),
                electric_potential: "phi_e".into(),
                conductivity: "sigma".into(),
                ion_conc: vec!["c1".into(), "c2".into()],
                ion_valence: vec![1.0, -2.0],
                diffusion: vec!["d1".into(), CoupledInput::Constant(2.0e-3)],
                faraday: FARADAY,
                direction: 2,
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        assert_jacobian(&k, &qp(&f));
    }

    #[test]
    fn test_electrolyte_current_length_mismatch() {
        let result = DirectionalFluxConstraint::electrolyte_current(
            ElectrolyteCurrentConfig {
                variable: "u".into(),
                electric_potential: "phi_e".into(),
                conductivity: "sigma".into(),
                ion_conc: vec!["c1".into(), "c2".into()],
                ion_valence: vec![1.0],
                diffusion: vec![],
                faraday: FARADAY,
                direction: 0,
            },
            &registry(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ohmic_heating_factor_two() {
        let reg = registry();
        let k = ElectrodeOhmicHeating::new(
            ElectrodeOhmicHeatingConfig {
                variable: "T".into(),
                electric_potential: "phi_s".into(),
                solid_frac: "eps".into(),
                conductivity: "sigma".into(),
            },
            &reg,
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);

        let grad = f[1].gradient;
        let expected = -ctx.test * 0.6 * 30.0 * 2.0 * grad.dot(&ctx.grad_phi);
        let analytic = k.compute_qp_off_diag_jacobian(&ctx, FieldId::new(1));
        assert!((analytic - expected).abs() < 1e-10);
        assert_eq!(k.compute_qp_jacobian(&ctx), 0.0);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_activity_constraint() {
        let k = ActivityConstraint::new(
            ActivityConfig {
                variable: "u".into(),
                activity_coeff: "a".into(),
                concentration: "c1".into(),
                ref_conc: 4.0,
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        let expected = ctx.test * (0.2 - 2.5 * 10.0 / 4.0);
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < 1e-12);
        assert_jacobian(&k, &ctx);
    }
}
