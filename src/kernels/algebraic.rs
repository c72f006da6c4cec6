//! Algebraic coupling kernels.
//!
//! These kernels define a field pointwise from other fields rather than
//! through a PDE. The weighted-sum family is
//!
//! R = ψ · (α·u − s · Σ wᵢ·vᵢ)
//!
//! with α = 1 for a constraint and α = 0 for a pure source of rate fields.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{self, check_lengths, collect_coupled, Coupled, CoupledInput, FieldRegistry};
use crate::term::{FieldSource, Kernel, QpContext};
use crate::types::FieldId;

/// Configuration shared by `WeightedCoupledSum` and `CoupledSumIC`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedSumConfig {
    pub variable: String,
    pub coupled_list: Vec<CoupledInput>,
    pub weights: Vec<f64>,
}

/// `ScaledWeightedCoupledSum`: R = ψ·(u − s·Σ wᵢ·vᵢ)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaledWeightedSumConfig {
    pub variable: String,
    pub coupled_list: Vec<CoupledInput>,
    pub weights: Vec<f64>,
    #[serde(default = "params::one_f64")]
    pub scale: f64,
}

/// `ScaledRateSource`: R = −ψ·s·Σ wᵢ·rᵢ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaledRateSourceConfig {
    pub variable: String,
    pub rates: Vec<CoupledInput>,
    pub weights: Vec<f64>,
    #[serde(default = "params::one_f64")]
    pub scale: f64,
}

/// Σ wᵢ·vᵢ over resolved inputs.
#[derive(Clone, Debug)]
pub struct WeightedSum {
    inputs: Vec<Coupled>,
    weights: Vec<f64>,
}

impl WeightedSum {
    pub fn from_inputs(
        object: &'static str,
        inputs: &[CoupledInput],
        weights: &[f64],
        registry: &FieldRegistry,
    ) -> Result<Self> {
        check_lengths(object, "coupled_list", inputs.len(), "weights", weights.len())?;
        Ok(Self {
            inputs: registry.resolve_all(object, inputs)?,
            weights: weights.to_vec(),
        })
    }

    #[inline]
    pub fn value<S: FieldSource>(&self, source: &S) -> f64 {
        self.inputs
            .iter()
            .zip(&self.weights)
            .map(|(v, w)| w * v.value(source))
            .sum()
    }

    /// Σ wᵢ over inputs bound to `wrt`.
    pub fn derivative(&self, wrt: FieldId) -> f64 {
        self.inputs
            .iter()
            .zip(&self.weights)
            .map(|(v, w)| w * v.indicator(wrt))
            .sum()
    }

    pub fn inputs(&self) -> &[Coupled] {
        &self.inputs
    }
}

/// Weighted-sum constraint or source.
#[derive(Clone, Debug)]
pub struct WeightedSumKernel {
    name: &'static str,
    variable: FieldId,
    self_coefficient: f64,
    scale: f64,
    sum: WeightedSum,
}

impl WeightedSumKernel {
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        self_coefficient: f64,
        scale: f64,
        sum: WeightedSum,
    ) -> Self {
        debug!("{name}: variable {variable}, {} terms", sum.inputs().len());
        Self {
            name,
            variable,
            self_coefficient,
            scale,
            sum,
        }
    }

    pub fn weighted_coupled_sum(config: WeightedSumConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "WeightedCoupledSum";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let sum = WeightedSum::from_inputs(NAME, &config.coupled_list, &config.weights, registry)?;
        Ok(Self::from_parts(NAME, u, 1.0, 1.0, sum))
    }

    pub fn scaled_weighted_coupled_sum(
        config: ScaledWeightedSumConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "ScaledWeightedCoupledSum";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let sum = WeightedSum::from_inputs(NAME, &config.coupled_list, &config.weights, registry)?;
        Ok(Self::from_parts(NAME, u, 1.0, config.scale, sum))
    }

    pub fn scaled_rate_source(config: ScaledRateSourceConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "ScaledRateSource";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let sum = WeightedSum::from_inputs(NAME, &config.rates, &config.weights, registry)?;
        Ok(Self::from_parts(NAME, u, 0.0, config.scale, sum))
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let own = if wrt == self.variable { self.self_coefficient } else { 0.0 };
        ctx.test * ctx.phi * (own - self.scale * self.sum.derivative(wrt))
    }
}

impl Kernel for WeightedSumKernel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let u = ctx.fields[self.variable].value;
        ctx.test * (self.self_coefficient * u - self.scale * self.sum.value(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.sum.inputs())
    }
}

/// `CoupledRatioConstraint`: R = ψ·(u − a/b)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoupledRatioConfig {
    pub variable: String,
    pub numerator: CoupledInput,
    #[serde(default = "params::one")]
    pub denominator: CoupledInput,
}

/// Ratio constraint u = a/b.
#[derive(Clone, Debug)]
pub struct CoupledRatioConstraint {
    variable: FieldId,
    numerator: Coupled,
    denominator: Coupled,
}

impl CoupledRatioConstraint {
    const NAME: &'static str = "CoupledRatioConstraint";

    pub fn new(config: CoupledRatioConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            numerator: registry.resolve(Self::NAME, &config.numerator)?,
            denominator: registry.resolve(Self::NAME, &config.denominator)?,
        })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let a = self.numerator.value(ctx);
        let b = self.denominator.value(ctx);
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        let d_ratio = (self.numerator.indicator(wrt) * b - a * self.denominator.indicator(wrt)) / (b * b);
        ctx.test * ctx.phi * (own - d_ratio)
    }
}

impl Kernel for CoupledRatioConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let ratio = self.numerator.value(ctx) / self.denominator.value(ctx);
        ctx.test * (ctx.fields[self.variable].value - ratio)
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, [&self.numerator, &self.denominator])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::testing::{assert_jacobian, qp};
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    fn fields() -> [FieldValue; 4] {
        [
            FieldValue::new(0.3),
            FieldValue::new(2.0),
            FieldValue::new(5.0),
            FieldValue::new(-1.5),
        ]
    }

    #[test]
    fn test_weighted_coupled_sum() {
        let reg = FieldRegistry::with_fields(["u", "a", "b", "c"]);
        let k = WeightedSumKernel::weighted_coupled_sum(
            WeightedSumConfig {
                variable: "u".into(),
                coupled_list: vec!["a".into(), "b".into(), "c".into()],
                weights: vec![1.0, -0.5, 2.0],
            },
            &reg,
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        let expected = ctx.test * (0.3 - (2.0 - 2.5 - 3.0));
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < TOL);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_repeated_field_weights_accumulate() {
        let reg = FieldRegistry::with_fields(["u", "a"]);
        let k = WeightedSumKernel::scaled_weighted_coupled_sum(
            ScaledWeightedSumConfig {
                variable: "u".into(),
                coupled_list: vec!["a".into(), "a".into()],
                weights: vec![1.0, 2.0],
                scale: 0.5,
            },
            &reg,
        )
        .unwrap();
        let f = [FieldValue::new(1.0), FieldValue::new(4.0)];
        let ctx = qp(&f);
        let od = k.compute_qp_off_diag_jacobian(&ctx, FieldId::new(1));
        assert!((od + ctx.test * ctx.phi * 1.5).abs() < TOL);
    }

    #[test]
    fn test_scaled_rate_source_has_no_diagonal() {
        let reg = FieldRegistry::with_fields(["u", "r1", "r2"]);
        let k = WeightedSumKernel::scaled_rate_source(
            ScaledRateSourceConfig {
                variable: "u".into(),
                rates: vec!["r1".into(), "r2".into()],
                weights: vec![1.0, -1.0],
                scale: 2.0,
            },
            &reg,
        )
        .unwrap();
        let f = [FieldValue::new(9.0), FieldValue::new(0.4), FieldValue::new(0.1)];
        let ctx = qp(&f);
        assert!((k.compute_qp_residual(&ctx) + ctx.test * 2.0 * 0.3).abs() < TOL);
        assert_eq!(k.compute_qp_jacobian(&ctx), 0.0);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_weight_length_mismatch() {
        let reg = FieldRegistry::with_fields(["u", "a"]);
        let result = WeightedSumKernel::weighted_coupled_sum(
            WeightedSumConfig {
                variable: "u".into(),
                coupled_list: vec!["a".into()],
                weights: vec![1.0, 2.0],
            },
            &reg,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_coupled_ratio_constraint() {
        let reg = FieldRegistry::with_fields(["u", "a", "b", "c"]);
        let k = CoupledRatioConstraint::new(
            CoupledRatioConfig {
                variable: "u".into(),
                numerator: "a".into(),
                denominator: "b".into(),
            },
            &reg,
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        assert!((k.compute_qp_residual(&ctx) - ctx.test * (0.3 - 0.4)).abs() < TOL);
        assert_jacobian(&k, &ctx);
    }
}
