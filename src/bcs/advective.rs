//! Advective boundary flux.
//!
//! With s = Π sᵢ (porosity for the pore variant) and outward normal n:
//!
//! outflow (v·n ≥ 0): R = ψ · s · (v·n) · u
//! inflow  (v·n < 0): R = ψ · s · (v·n) · u_in
//!
//! The inflow value comes from a coupled input, a [`TemporalSchedule`],
//! or the first-order recycle of an outlet postprocessor. The recycle reads
//! its previous inlet value from a dedicated inlet field, normally the
//! variable of a `FirstOrderRecycle` aux kernel, since the boundary value of
//! u is set by the interior solution.

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{
    self, check_non_negative, collect_coupled, product, product_derivative, Coupled, CoupledInput,
    FieldRegistry,
};
use crate::schedule::{first_order_recycle, TemporalSchedule};
use crate::term::{FieldSource, Kernel, QpContext};
use crate::types::{FieldId, PostprocessorId};

/// `AdvectiveFluxBC` and `PoreAdvectiveFluxBC`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvectiveFluxBCConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
    /// Pore variant only
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    /// Value carried in through an inflow boundary
    #[serde(default = "params::zero")]
    pub inlet_value: CoupledInput,
}

/// `StepwiseInletBC`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepwiseInletBCConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    #[serde(default)]
    pub start_value: f64,
    pub input_times: Vec<f64>,
    pub input_values: Vec<f64>,
    #[serde(default)]
    pub time_spans: Vec<f64>,
}

/// `FirstOrderRecycleBC`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstOrderRecycleBCConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    /// Recycle rate R (1/s)
    pub recycle_rate: f64,
    /// Postprocessor holding the outlet value C_out
    pub outlet_postprocessor: String,
    /// Field whose old value is the previous inlet value C_in_old
    pub inlet_var: String,
}

/// Source of the inflow value.
#[derive(Clone, Debug)]
pub enum InletValue {
    Coupled(Coupled),
    Schedule(TemporalSchedule),
    /// Implicit-Euler recycle from the inlet field's old value toward an
    /// outlet postprocessor
    Recycle {
        rate: f64,
        outlet: PostprocessorId,
        inlet: FieldId,
    },
}

impl InletValue {
    fn value(&self, ctx: &QpContext) -> f64 {
        match self {
            Self::Coupled(c) => c.value(ctx),
            Self::Schedule(s) => s.value_at(ctx.time),
            Self::Recycle {
                rate,
                outlet,
                inlet,
            } => first_order_recycle(
                ctx.fields[*inlet].old,
                ctx.postprocessor(*outlet),
                *rate,
                ctx.dt,
            ),
        }
    }

    fn derivative(&self, wrt: FieldId) -> f64 {
        match self {
            Self::Coupled(c) => c.indicator(wrt),
            Self::Schedule(_) | Self::Recycle { .. } => 0.0,
        }
    }
}

/// Upwinded advective flux through a boundary.
#[derive(Clone, Debug)]
pub struct AdvectiveBoundary {
    name: &'static str,
    variable: FieldId,
    velocity: [Coupled; 3],
    scale: Vec<Coupled>,
    inlet: InletValue,
}

impl AdvectiveBoundary {
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        velocity: [Coupled; 3],
        scale: Vec<Coupled>,
        inlet: InletValue,
    ) -> Self {
        debug!("{name}: variable {variable}, inlet {inlet:?}");
        Self {
            name,
            variable,
            velocity,
            scale,
            inlet,
        }
    }

    fn resolve_velocity(
        name: &'static str,
        [ux, uy, uz]: [&CoupledInput; 3],
        registry: &FieldRegistry,
    ) -> Result<[Coupled; 3]> {
        Ok([
            registry.resolve(name, ux)?,
            registry.resolve(name, uy)?,
            registry.resolve(name, uz)?,
        ])
    }

    pub fn advective_flux(config: AdvectiveFluxBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "AdvectiveFluxBC";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            Self::resolve_velocity(NAME, [&config.ux, &config.uy, &config.uz], registry)?,
            Vec::new(),
            InletValue::Coupled(registry.resolve(NAME, &config.inlet_value)?),
        ))
    }

    pub fn pore_advective_flux(config: AdvectiveFluxBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PoreAdvectiveFluxBC";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            Self::resolve_velocity(NAME, [&config.ux, &config.uy, &config.uz], registry)?,
            vec![registry.resolve(NAME, &config.porosity)?],
            InletValue::Coupled(registry.resolve(NAME, &config.inlet_value)?),
        ))
    }

    pub fn stepwise_inlet(config: StepwiseInletBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "StepwiseInletBC";
        let schedule = TemporalSchedule::new(
            NAME,
            config.start_value,
            &config.input_times,
            &config.input_values,
            &config.time_spans,
        )?;
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            Self::resolve_velocity(NAME, [&config.ux, &config.uy, &config.uz], registry)?,
            vec![registry.resolve(NAME, &config.porosity)?],
            InletValue::Schedule(schedule),
        ))
    }

    pub fn first_order_recycle(
        config: FirstOrderRecycleBCConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "FirstOrderRecycleBC";
        check_non_negative(NAME, "recycle_rate", config.recycle_rate)?;
        let inlet = InletValue::Recycle {
            rate: config.recycle_rate,
            outlet: registry.resolve_postprocessor(NAME, &config.outlet_postprocessor)?,
            inlet: registry.resolve_field(NAME, &config.inlet_var)?,
        };
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            Self::resolve_velocity(NAME, [&config.ux, &config.uy, &config.uz], registry)?,
            vec![registry.resolve(NAME, &config.porosity)?],
            inlet,
        ))
    }

    pub fn inlet(&self) -> &InletValue {
        &self.inlet
    }

    #[inline]
    fn velocity<S: FieldSource>(&self, source: &S) -> Vector3<f64> {
        Vector3::new(
            self.velocity[0].value(source),
            self.velocity[1].value(source),
            self.velocity[2].value(source),
        )
    }

    /// Upwinded boundary value and whether the point is an outflow.
    #[inline]
    fn upwind(&self, ctx: &QpContext) -> (f64, bool) {
        if self.velocity(ctx).dot(&ctx.normal) >= 0.0 {
            (ctx.fields[self.variable].value, true)
        } else {
            (self.inlet.value(ctx), false)
        }
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let vn = self.velocity(ctx).dot(&ctx.normal);
        let s = product(&self.scale, ctx);
        let (c, outflow) = self.upwind(ctx);

        let mut total = product_derivative(&self.scale, ctx, wrt) * vn * c;
        for (k, component) in self.velocity.iter().enumerate() {
            if component.is(wrt) {
                total += s * ctx.normal[k] * c;
            }
        }
        let dc = if outflow {
            if wrt == self.variable { 1.0 } else { 0.0 }
        } else {
            self.inlet.derivative(wrt)
        };
        total += s * vn * dc;
        ctx.test * ctx.phi * total
    }
}

impl Kernel for AdvectiveBoundary {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let vn = self.velocity(ctx).dot(&ctx.normal);
        let (c, _) = self.upwind(ctx);
        ctx.test * product(&self.scale, ctx) * vn * c
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let inlet = match self.inlet {
            InletValue::Coupled(c) => Some(c),
            _ => None,
        };
        collect_coupled(
            self.variable,
            self.velocity.iter().chain(&self.scale).chain(inlet.iter()),
        )
    }
}
