//! Gradient-driven flux constraints and porous-media velocity kernels.
//!
//! A directional flux constraint defines a flux component u from one or
//! more gradient-driven terms along a fixed axis:
//!
//! R = ψ · (u + Σⱼ cⱼ · Π fⱼₖ · ∂Φⱼ/∂x_dir)
//!
//! Darcy velocity, Schlögl velocity, and the electrode/electrolyte current
//! densities are all of this form.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{
    self, check_direction, collect_coupled, product, product_derivative, Coupled, CoupledInput,
    FieldRegistry,
};
use crate::term::{Kernel, QpContext};
use crate::types::FieldId;

/// One gradient-driven contribution c · Π f · ∂Φ/∂x_dir.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientTerm {
    pub coefficient: f64,
    pub factors: Vec<Coupled>,
    pub potential: Coupled,
}

/// `DarcyVelocity`: v_dir = −K·∂p/∂x_dir
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DarcyVelocityConfig {
    pub variable: String,
    pub pressure: String,
    /// Darcy coefficient K (permeability over viscosity)
    #[serde(default = "params::one")]
    pub darcy_coeff: CoupledInput,
    pub direction: usize,
}

/// `SchloeglVelocity`: v_dir = −K_p·∂p/∂x_dir − K_φ·∂Φ/∂x_dir
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchloeglVelocityConfig {
    pub variable: String,
    pub pressure: String,
    pub electric_potential: String,
    #[serde(default = "params::one")]
    pub darcy_coeff: CoupledInput,
    #[serde(default = "params::zero")]
    pub electrokinetic_coeff: CoupledInput,
    pub direction: usize,
}

/// Flux component defined by gradient-driven terms.
#[derive(Clone, Debug)]
pub struct DirectionalFluxConstraint {
    name: &'static str,
    variable: FieldId,
    direction: usize,
    terms: Vec<GradientTerm>,
}

impl DirectionalFluxConstraint {
    /// Build from resolved terms; `direction` must be 0, 1, or 2.
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        direction: usize,
        terms: Vec<GradientTerm>,
    ) -> Result<Self> {
        let direction = check_direction(name, direction)?;
        debug!("{name}: variable {variable}, direction {direction}, {} terms", terms.len());
        Ok(Self {
            name,
            variable,
            direction,
            terms,
        })
    }

    pub fn darcy_velocity(config: DarcyVelocityConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "DarcyVelocity";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let terms = vec![GradientTerm {
            coefficient: 1.0,
            factors: vec![registry.resolve(NAME, &config.darcy_coeff)?],
            potential: Coupled::Field(registry.resolve_field(NAME, &config.pressure)?),
        }];
        Self::from_parts(NAME, u, config.direction, terms)
    }

    pub fn schloegl_velocity(config: SchloeglVelocityConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "SchloeglVelocity";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let terms = vec![
            GradientTerm {
                coefficient: 1.0,
                factors: vec![registry.resolve(NAME, &config.darcy_coeff)?],
                potential: Coupled::Field(registry.resolve_field(NAME, &config.pressure)?),
            },
            GradientTerm {
                coefficient: 1.0,
                factors: vec![registry.resolve(NAME, &config.electrokinetic_coeff)?],
                potential: Coupled::Field(
                    registry.resolve_field(NAME, &config.electric_potential)?,
                ),
            },
        ];
        Self::from_parts(NAME, u, config.direction, terms)
    }

    /// Axis of the flux component.
    pub fn direction(&self) -> usize {
        self.direction
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let dir = self.direction;
        let mut d = if wrt == self.variable { ctx.phi } else { 0.0 };
        for term in &self.terms {
            let grad = term.potential.gradient(ctx)[dir];
            d += term.coefficient * product_derivative(&term.factors, ctx, wrt) * ctx.phi * grad;
            if term.potential.is(wrt) {
                d += term.coefficient * product(&term.factors, ctx) * ctx.grad_phi[dir];
            }
        }
        ctx.test * d
    }
}

impl Kernel for DirectionalFluxConstraint {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let dir = self.direction;
        let driven: f64 = self
            .terms
            .iter()
            .map(|t| t.coefficient * product(&t.factors, ctx) * t.potential.gradient(ctx)[dir])
            .sum();
        ctx.test * (ctx.fields[self.variable].value + driven)
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(
            self.variable,
            self.terms
                .iter()
                .flat_map(|t| t.factors.iter().chain(std::iter::once(&t.potential))),
        )
    }
}
