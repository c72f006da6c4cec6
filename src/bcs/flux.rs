//! Prescribed and exchange fluxes through a boundary.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{self, collect_coupled, Coupled, CoupledInput, FieldRegistry};
use crate::term::{Kernel, QpContext};
use crate::types::FieldId;

/// `HeatTransferBC`: R = ψ·h·(T − T_∞)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatTransferBCConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub transfer_coef: CoupledInput,
    #[serde(default = "params::standard_temperature")]
    pub ambient_temperature: CoupledInput,
}

/// Newton cooling through a boundary.
#[derive(Clone, Debug)]
pub struct HeatTransferBC {
    variable: FieldId,
    transfer_coef: Coupled,
    ambient: Coupled,
}

impl HeatTransferBC {
    const NAME: &'static str = "HeatTransferBC";

    pub fn new(config: HeatTransferBCConfig, registry: &FieldRegistry) -> Result<Self> {
        let variable = registry.resolve_field(Self::NAME, &config.variable)?;
        debug!("{}: variable {variable}", Self::NAME);
        Ok(Self {
            variable,
            transfer_coef: registry.resolve(Self::NAME, &config.transfer_coef)?,
            ambient: registry.resolve(Self::NAME, &config.ambient_temperature)?,
        })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let h = self.transfer_coef.value(ctx);
        let dt = ctx.fields[self.variable].value - self.ambient.value(ctx);
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        ctx.test * ctx.phi * (self.transfer_coef.indicator(wrt) * dt + h * (own - self.ambient.indicator(wrt)))
    }
}

impl Kernel for HeatTransferBC {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let t = ctx.fields[self.variable].value;
        ctx.test * self.transfer_coef.value(ctx) * (t - self.ambient.value(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, [&self.transfer_coef, &self.ambient])
    }
}

/// `ConstantFluxBC`: R = −ψ·q
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantFluxBCConfig {
    pub variable: String,
    /// Inward flux q
    #[serde(default)]
    pub flux: f64,
}

/// `CoupledFluxBC`: R = −ψ·s·v
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoupledFluxBCConfig {
    pub variable: String,
    pub coupled: CoupledInput,
    #[serde(default = "params::one_f64")]
    pub scale: f64,
}

/// Inward flux that does not depend on the primary field.
#[derive(Clone, Debug)]
pub struct BoundaryFlux {
    name: &'static str,
    variable: FieldId,
    scale: f64,
    flux: Coupled,
}

impl BoundaryFlux {
    pub fn constant(config: ConstantFluxBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "ConstantFluxBC";
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            scale: 1.0,
            flux: Coupled::Constant(config.flux),
        })
    }

    pub fn coupled(config: CoupledFluxBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "CoupledFluxBC";
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            scale: config.scale,
            flux: registry.resolve(NAME, &config.coupled)?,
        })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        -ctx.test * self.scale * self.flux.indicator(wrt) * ctx.phi
    }
}

impl Kernel for BoundaryFlux {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        -ctx.test * self.scale * self.flux.value(ctx)
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, [&self.flux])
    }
}
