//! Advection and migration kernels.
//!
//! Advection in conservative weak form:
//!
//! R = −∇ψ · (s · v · u),   s = c · Π sᵢ
//!
//! with a coupled velocity v = (v_x, v_y, v_z). Electromigration
//! (Nernst–Planck) moves charged species along the potential gradient:
//!
//! R = ∇ψ · (ε · z·F/(R·T) · D · u · ∇Φ)

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{default_faraday, default_gas_constant};
use crate::error::Result;
use crate::params::{
    self, collect_coupled, product, product_derivative, Coupled, CoupledInput, FieldRegistry,
};
use crate::term::{FieldSource, Kernel, QpContext};
use crate::types::FieldId;

/// `CoupledAdvection`, `PoreConcAdvection`, and `PhaseEnergyAdvection`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvectionConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
    /// Porosity or volume fraction (pore and phase-energy variants)
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    /// Phase-energy variant only
    #[serde(default = "params::one")]
    pub density: CoupledInput,
    /// Phase-energy variant only
    #[serde(default = "params::one")]
    pub specific_heat: CoupledInput,
}

/// Velocity-driven flux divergence.
#[derive(Clone, Debug)]
pub struct FluxAdvection {
    name: &'static str,
    variable: FieldId,
    coefficient: f64,
    velocity: [Coupled; 3],
    scale: Vec<Coupled>,
}

impl FluxAdvection {
    /// Build directly from resolved parts.
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        coefficient: f64,
        velocity: [Coupled; 3],
        scale: Vec<Coupled>,
    ) -> Self {
        debug!("{name}: variable {variable}, velocity {velocity:?}");
        Self {
            name,
            variable,
            coefficient,
            velocity,
            scale,
        }
    }

    fn resolve_velocity(
        name: &'static str,
        config: &AdvectionConfig,
        registry: &FieldRegistry,
    ) -> Result<[Coupled; 3]> {
        Ok([
            registry.resolve(name, &config.ux)?,
            registry.resolve(name, &config.uy)?,
            registry.resolve(name, &config.uz)?,
        ])
    }

    pub fn coupled(config: AdvectionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "CoupledAdvection";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let v = Self::resolve_velocity(NAME, &config, registry)?;
        Ok(Self::from_parts(NAME, u, 1.0, v, Vec::new()))
    }

    pub fn pore_conc(config: AdvectionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PoreConcAdvection";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let v = Self::resolve_velocity(NAME, &config, registry)?;
        let eps = registry.resolve(NAME, &config.porosity)?;
        Ok(Self::from_parts(NAME, u, 1.0, v, vec![eps]))
    }

    pub fn phase_energy(config: AdvectionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PhaseEnergyAdvection";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let v = Self::resolve_velocity(NAME, &config, registry)?;
        let scale = vec![
            registry.resolve(NAME, &config.porosity)?,
            registry.resolve(NAME, &config.density)?,
            registry.resolve(NAME, &config.specific_heat)?,
        ];
        Ok(Self::from_parts(NAME, u, 1.0, v, scale))
    }

    #[inline]
    fn velocity<S: FieldSource>(&self, source: &S) -> Vector3<f64> {
        Vector3::new(
            self.velocity[0].value(source),
            self.velocity[1].value(source),
            self.velocity[2].value(source),
        )
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let u = ctx.fields[self.variable].value;
        let v = self.velocity(ctx);
        let s = self.coefficient * product(&self.scale, ctx);
        let v_dot_grad_test = v.dot(&ctx.grad_test);

        let mut total =
            self.coefficient * product_derivative(&self.scale, ctx, wrt) * ctx.phi * v_dot_grad_test * u;
        for (k, component) in self.velocity.iter().enumerate() {
            if component.is(wrt) {
                total += s * ctx.phi * ctx.grad_test[k] * u;
            }
        }
        if wrt == self.variable {
            total += s * v_dot_grad_test * ctx.phi;
        }
        -total
    }
}

impl Kernel for FluxAdvection {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let u = ctx.fields[self.variable].value;
        let s = self.coefficient * product(&self.scale, ctx);
        -s * self.velocity(ctx).dot(&ctx.grad_test) * u
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.velocity.iter().chain(&self.scale))
    }
}

/// `NernstPlanckMigration`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NernstPlanckMigrationConfig {
    pub variable: String,
    /// Electric potential Φ
    pub electric_potential: String,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    #[serde(default = "params::one")]
    pub diffusivity: CoupledInput,
    #[serde(default = "params::standard_temperature")]
    pub temperature: CoupledInput,
    /// Ion valence z
    #[serde(default)]
    pub valence: f64,
    #[serde(default = "default_faraday")]
    pub faraday: f64,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
}

/// Electromigration of a charged species.
#[derive(Clone, Debug)]
pub struct NernstPlanckMigration {
    variable: FieldId,
    potential: FieldId,
    factors: [Coupled; 2],
    temperature: Coupled,
    valence: f64,
    faraday: f64,
    gas_constant: f64,
}

impl NernstPlanckMigration {
    const NAME: &'static str = "NernstPlanckMigration";

    pub fn new(config: NernstPlanckMigrationConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        let variable = registry.resolve_field(object, &config.variable)?;
        let potential = registry.resolve_field(object, &config.electric_potential)?;
        debug!("{object}: variable {variable}, potential {potential}, z = {}", config.valence);
        Ok(Self {
            variable,
            potential,
            factors: [
                registry.resolve(object, &config.porosity)?,
                registry.resolve(object, &config.diffusivity)?,
            ],
            temperature: registry.resolve(object, &config.temperature)?,
            valence: config.valence,
            faraday: config.faraday,
            gas_constant: config.gas_constant,
        })
    }

    /// z·F/(R·T)
    #[inline]
    fn mobility_factor<S: FieldSource>(&self, source: &S) -> f64 {
        self.valence * self.faraday / (self.gas_constant * self.temperature.value(source))
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let u = ctx.fields[self.variable].value;
        let grad_phi_e = ctx.fields[self.potential].gradient;
        let m = self.mobility_factor(ctx);
        let p = product(&self.factors, ctx);
        let k = m * p;
        let drive = grad_phi_e.dot(&ctx.grad_test);

        let mut total = m * product_derivative(&self.factors, ctx, wrt) * ctx.phi * u * drive;
        if self.temperature.is(wrt) {
            total -= k / self.temperature.value(ctx) * ctx.phi * u * drive;
        }
        if wrt == self.variable {
            total += k * ctx.phi * drive;
        }
        if wrt == self.potential {
            total += k * u * ctx.grad_phi.dot(&ctx.grad_test);
        }
        total
    }
}

impl Kernel for NernstPlanckMigration {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let u = ctx.fields[self.variable].value;
        let grad_phi_e = ctx.fields[self.potential].gradient;
        self.mobility_factor(ctx) * product(&self.factors, ctx) * u * grad_phi_e.dot(&ctx.grad_test)
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
            self.factors
                .iter()
                .chain([&self.temperature, &potential]),
        )
    }
}
