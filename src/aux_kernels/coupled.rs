//! Auxiliary evaluators built directly from coupled fields.

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kernels::{CoupledRatioConfig, InhibitionProductsConfig, WeightedSum};
use crate::params::{
    self, check_lengths, check_non_negative, power_product, Coupled, CoupledInput, FieldRegistry,
};
use crate::schedule::first_order_recycle;
use crate::term::{AuxContext, AuxKernel, FieldSource};
use crate::types::{FieldId, PostprocessorId};

// =============================================================================
// Sums and ratios
// =============================================================================

/// `CoupledSumFunction`: Σ vᵢ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoupledSumFunctionConfig {
    pub variable: String,
    pub coupled_list: Vec<CoupledInput>,
}

/// `LinearCombination`: b + Σ wᵢ·vᵢ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearCombinationConfig {
    pub variable: String,
    #[serde(default)]
    pub base_value: f64,
    pub coupled_list: Vec<CoupledInput>,
    pub weights: Vec<f64>,
}

/// Offset weighted sum of coupled fields.
#[derive(Clone, Debug)]
pub struct LinearCombination {
    name: &'static str,
    variable: FieldId,
    base: f64,
    sum: WeightedSum,
}

impl LinearCombination {
    pub fn coupled_sum(config: CoupledSumFunctionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "CoupledSumFunction";
        let weights = vec![1.0; config.coupled_list.len()];
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            base: 0.0,
            sum: WeightedSum::from_inputs(NAME, &config.coupled_list, &weights, registry)?,
        })
    }

    pub fn linear_combination(config: LinearCombinationConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "LinearCombination";
        Ok(Self {
            name: NAME,
            variable: registry.resolve_field(NAME, &config.variable)?,
            base: config.base_value,
            sum: WeightedSum::from_inputs(NAME, &config.coupled_list, &config.weights, registry)?,
        })
    }
}

impl AuxKernel for LinearCombination {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.base + self.sum.value(ctx)
    }
}

/// `CoupledRatio`: a/b
#[derive(Clone, Debug)]
pub struct CoupledRatio {
    variable: FieldId,
    numerator: Coupled,
    denominator: Coupled,
}

impl CoupledRatio {
    const NAME: &'static str = "CoupledRatio";

    pub fn new(config: CoupledRatioConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            numerator: registry.resolve(Self::NAME, &config.numerator)?,
            denominator: registry.resolve(Self::NAME, &config.denominator)?,
        })
    }
}

impl AuxKernel for CoupledRatio {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.numerator.value(ctx) / self.denominator.value(ctx)
    }
}

/// `InhibitionProductsAux`: Π Cᵢ^{pᵢ}
#[derive(Clone, Debug)]
pub struct InhibitionProductsAux {
    variable: FieldId,
    factors: Vec<Coupled>,
    powers: Vec<f64>,
}

impl InhibitionProductsAux {
    const NAME: &'static str = "InhibitionProductsAux";

    pub fn new(config: InhibitionProductsConfig, registry: &FieldRegistry) -> Result<Self> {
        check_lengths(
            Self::NAME,
            "coupled_list",
            config.coupled_list.len(),
            "power_list",
            config.power_list.len(),
        )?;
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            factors: registry.resolve_all(Self::NAME, &config.coupled_list)?,
            powers: config.power_list,
        })
    }
}

impl AuxKernel for InhibitionProductsAux {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        power_product(&self.factors, &self.powers, ctx)
    }
}

// =============================================================================
// Vectors and recycle
// =============================================================================

/// `VectorMagnitude`: |(v_x, v_y, v_z)|
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorMagnitudeConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub ux: CoupledInput,
    #[serde(default = "params::zero")]
    pub uy: CoupledInput,
    #[serde(default = "params::zero")]
    pub uz: CoupledInput,
}

/// Euclidean norm of three coupled components.
#[derive(Clone, Debug)]
pub struct VectorMagnitude {
    variable: FieldId,
    components: [Coupled; 3],
}

impl VectorMagnitude {
    const NAME: &'static str = "VectorMagnitude";

    pub fn new(config: VectorMagnitudeConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            components: [
                registry.resolve(Self::NAME, &config.ux)?,
                registry.resolve(Self::NAME, &config.uy)?,
                registry.resolve(Self::NAME, &config.uz)?,
            ],
        })
    }

    /// The vector at one point.
    pub fn vector<S: FieldSource>(&self, source: &S) -> Vector3<f64> {
        Vector3::new(
            self.components[0].value(source),
            self.components[1].value(source),
            self.components[2].value(source),
        )
    }
}

impl AuxKernel for VectorMagnitude {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.vector(ctx).norm()
    }
}

/// `FirstOrderRecycle`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstOrderRecycleConfig {
    pub variable: String,
    /// Recycle rate R (1/s)
    pub recycle_rate: f64,
    /// Postprocessor holding the outlet value
    pub outlet_postprocessor: String,
}

/// Inlet value relaxed toward an outlet postprocessor, one implicit-Euler
/// step per time step from the variable's old value.
#[derive(Clone, Debug)]
pub struct FirstOrderRecycle {
    variable: FieldId,
    rate: f64,
    outlet: PostprocessorId,
}

impl FirstOrderRecycle {
    const NAME: &'static str = "FirstOrderRecycle";

    pub fn new(config: FirstOrderRecycleConfig, registry: &FieldRegistry) -> Result<Self> {
        check_non_negative(Self::NAME, "recycle_rate", config.recycle_rate)?;
        let outlet = registry.resolve_postprocessor(Self::NAME, &config.outlet_postprocessor)?;
        debug!("{}: rate {} from {outlet}", Self::NAME, config.recycle_rate);
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            rate: config.recycle_rate,
            outlet,
        })
    }
}

impl AuxKernel for FirstOrderRecycle {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        first_order_recycle(ctx.old, ctx.postprocessor(self.outlet), self.rate, ctx.dt)
    }
}
