//! Volumetric transfer between co-located phases.
//!
//! R = −ψ · c · Π fᵢ · (w − u)
//!
//! where w is the field in the other phase (concentration or temperature).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{
    self, collect_coupled, product, product_derivative, Coupled, CoupledInput, FieldRegistry,
};
use crate::term::{Kernel, QpContext};
use crate::types::FieldId;

/// `ConstMassTransfer`: R = −ψ·km·(v − u)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstMassTransferConfig {
    pub variable: String,
    /// Concentration in the other phase
    pub coupled: String,
    #[serde(default = "params::one_f64")]
    pub transfer_rate: f64,
}

/// `FilmMassTransfer`: R = −ψ·a·ε·km·(v − u)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilmMassTransferConfig {
    pub variable: String,
    pub coupled: String,
    /// Film mass-transfer coefficient km
    pub rate_variable: CoupledInput,
    /// Area-to-volume ratio a
    #[serde(default = "params::one")]
    pub av_ratio: CoupledInput,
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
}

/// `PhaseEnergyTransfer`: R = −ψ·h·A_o·ε·(T_other − T)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseEnergyTransferConfig {
    pub variable: String,
    /// Temperature of the other phase
    pub other_phase_temperature: String,
    #[serde(default = "params::one")]
    pub transfer_coef: CoupledInput,
    #[serde(default = "params::one")]
    pub specific_area: CoupledInput,
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
}

/// Linear driving-force transfer between two phases.
#[derive(Clone, Debug)]
pub struct VolumetricTransfer {
    name: &'static str,
    variable: FieldId,
    other: FieldId,
    coefficient: f64,
    factors: Vec<Coupled>,
}

impl VolumetricTransfer {
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        other: FieldId,
        coefficient: f64,
        factors: Vec<Coupled>,
    ) -> Self {
        debug!("{name}: {variable} exchanges with {other}");
        Self {
            name,
            variable,
            other,
            coefficient,
            factors,
        }
    }

    pub fn const_mass(config: ConstMassTransferConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "ConstMassTransfer";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.coupled)?,
            config.transfer_rate,
            Vec::new(),
        ))
    }

    pub fn film_mass(config: FilmMassTransferConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "FilmMassTransfer";
        let factors = vec![
            registry.resolve(NAME, &config.rate_variable)?,
            registry.resolve(NAME, &config.av_ratio)?,
            registry.resolve(NAME, &config.volume_frac)?,
        ];
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.coupled)?,
            1.0,
            factors,
        ))
    }

    pub fn phase_energy(config: PhaseEnergyTransferConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PhaseEnergyTransfer";
        let factors = vec![
            registry.resolve(NAME, &config.transfer_coef)?,
            registry.resolve(NAME, &config.specific_area)?,
            registry.resolve(NAME, &config.volume_frac)?,
        ];
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.other_phase_temperature)?,
            1.0,
            factors,
        ))
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let driving = ctx.fields[self.other].value - ctx.fields[self.variable].value;
        let k = self.coefficient * product(&self.factors, ctx);
        let mut d = self.coefficient * product_derivative(&self.factors, ctx, wrt) * driving;
        if wrt == self.other {
            d += k;
        }
        if wrt == self.variable {
            d -= k;
        }
        -ctx.test * ctx.phi * d
    }
}

impl Kernel for VolumetricTransfer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let driving = ctx.fields[self.other].value - ctx.fields[self.variable].value;
        -ctx.test * self.coefficient * product(&self.factors, ctx) * driving
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let other = Coupled::Field(self.other);
        collect_coupled(self.variable, self.factors.iter().chain(std::iter::once(&other)))
    }
}
