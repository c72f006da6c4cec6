//! Time-derivative (accumulation) kernels.
//!
//! All variants share one form:
//!
//! R = c · Π fᵢ · ẇ · ψ
//!
//! where c is a constant, fᵢ are coupled factors (porosity, density, heat
//! capacity, ...), and w is either the primary field or another coupled
//! field.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{self, collect_coupled, product, product_derivative, Coupled, CoupledInput, FieldRegistry};
use crate::term::{Kernel, QpContext};
use crate::types::FieldId;

/// `CoefTimeDerivative`: R = c·u̇·ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoefTimeDerivativeConfig {
    pub variable: String,
    #[serde(default = "params::one_f64")]
    pub coefficient: f64,
}

/// `VariableCoefTimeDerivative`: R = c(x)·u̇·ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableCoefTimeDerivativeConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub coupled_coef: CoupledInput,
}

/// `CoupledCoefTimeDerivative`: R = c·v̇·ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoupledCoefTimeDerivativeConfig {
    pub variable: String,
    /// Field whose time derivative is taken
    pub coupled: String,
    #[serde(default = "params::one_f64")]
    pub coefficient: f64,
}

/// `PorousTimeDerivative`: R = ε·u̇·ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PorousTimeDerivativeConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
}

/// `PhaseEnergyTimeDerivative`: R = ε·ρ·cp·Ṫ·ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseEnergyTimeDerivativeConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
    #[serde(default = "params::one")]
    pub density: CoupledInput,
    #[serde(default = "params::one")]
    pub specific_heat: CoupledInput,
}

/// Product-coefficient time derivative.
#[derive(Clone, Debug)]
pub struct ProductTimeDerivative {
    name: &'static str,
    variable: FieldId,
    target: FieldId,
    coefficient: f64,
    factors: Vec<Coupled>,
}

impl ProductTimeDerivative {
    /// Build directly from resolved parts.
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        target: FieldId,
        coefficient: f64,
        factors: Vec<Coupled>,
    ) -> Self {
        debug!("{name}: variable {variable}, d/dt of {target}, {} factors", factors.len());
        Self {
            name,
            variable,
            target,
            coefficient,
            factors,
        }
    }

    pub fn coef(config: CoefTimeDerivativeConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "CoefTimeDerivative";
        let u = registry.resolve_field(NAME, &config.variable)?;
        Ok(Self::from_parts(NAME, u, u, config.coefficient, Vec::new()))
    }

    pub fn variable_coef(config: VariableCoefTimeDerivativeConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "VariableCoefTimeDerivative";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let c = registry.resolve(NAME, &config.coupled_coef)?;
        Ok(Self::from_parts(NAME, u, u, 1.0, vec![c]))
    }

    pub fn coupled_coef(config: CoupledCoefTimeDerivativeConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "CoupledCoefTimeDerivative";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let v = registry.resolve_field(NAME, &config.coupled)?;
        Ok(Self::from_parts(NAME, u, v, config.coefficient, Vec::new()))
    }

    pub fn porous(config: PorousTimeDerivativeConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PorousTimeDerivative";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let eps = registry.resolve(NAME, &config.porosity)?;
        Ok(Self::from_parts(NAME, u, u, 1.0, vec![eps]))
    }

    pub fn phase_energy(config: PhaseEnergyTimeDerivativeConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PhaseEnergyTimeDerivative";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let factors = vec![
            registry.resolve(NAME, &config.volume_frac)?,
            registry.resolve(NAME, &config.density)?,
            registry.resolve(NAME, &config.specific_heat)?,
        ];
        Ok(Self::from_parts(NAME, u, u, 1.0, factors))
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let w_dot = ctx.fields[self.target].dot;
        let mut d = self.coefficient * product_derivative(&self.factors, ctx, wrt) * ctx.phi * w_dot;
        if wrt == self.target {
            d += self.coefficient * product(&self.factors, ctx) * ctx.phi * ctx.du_dot_du;
        }
        d * ctx.test
    }
}

impl Kernel for ProductTimeDerivative {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        self.coefficient * product(&self.factors, ctx) * ctx.fields[self.target].dot * ctx.test
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let target = Coupled::Field(self.target);
        collect_coupled(self.variable, self.factors.iter().chain(std::iter::once(&target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::testing::{assert_jacobian, qp};
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_coef_time_derivative() {
        let reg = FieldRegistry::with_fields(["u"]);
        let k = ProductTimeDerivative::coef(
            CoefTimeDerivativeConfig {
                variable: "u".into(),
                coefficient: 3.0,
            },
            &reg,
        )
        .unwrap();
        let fields = [FieldValue::new(1.0).with_dot(2.0)];
        let ctx = qp(&fields);
        assert!((k.compute_qp_residual(&ctx) - 3.0 * 2.0 * ctx.test).abs() < TOL);
        assert!((k.compute_qp_jacobian(&ctx) - 3.0 * ctx.phi * ctx.du_dot_du * ctx.test).abs() < TOL);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_coupled_coef_has_no_diagonal() {
        let reg = FieldRegistry::with_fields(["u", "v"]);
        let k = ProductTimeDerivative::coupled_coef(
            CoupledCoefTimeDerivativeConfig {
                variable: "u".into(),
                coupled: "v".into(),
                coefficient: 2.0,
            },
            &reg,
        )
        .unwrap();
        let fields = [FieldValue::new(1.0).with_dot(5.0), FieldValue::new(2.0).with_dot(0.5)];
        let ctx = qp(&fields);
        assert_eq!(k.compute_qp_jacobian(&ctx), 0.0);
        assert_eq!(k.coupled_fields(), vec![FieldId::new(1)]);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_phase_energy_jacobian() {
        let reg = FieldRegistry::with_fields(["T", "eps", "rho", "cp"]);
        let k = ProductTimeDerivative::phase_energy(
            PhaseEnergyTimeDerivativeConfig {
                variable: "T".into(),
                volume_frac: "eps".into(),
                density: "rho".into(),
                specific_heat: "cp".into(),
            },
            &reg,
        )
        .unwrap();
        let fields = [
            FieldValue::new(400.0).with_dot(1.5),
            FieldValue::new(0.4),
            FieldValue::new(1.2),
            FieldValue::new(1000.0),
        ];
        let ctx = qp(&fields);
        assert_jacobian(&k, &ctx);
        assert_eq!(k.coupled_fields().len(), 3);
    }

    #[test]
    fn test_variable_and_porous() {
        let reg = FieldRegistry::with_fields(["u", "c"]);
        let fields = [FieldValue::new(2.0).with_dot(-1.0), FieldValue::new(0.3)];
        let ctx = qp(&fields);

        let k = ProductTimeDerivative::variable_coef(
            VariableCoefTimeDerivativeConfig {
                variable: "u".into(),
                coupled_coef: "c".into(),
            },
            &reg,
        )
        .unwrap();
        assert_jacobian(&k, &ctx);

        let k = ProductTimeDerivative::porous(
            PorousTimeDerivativeConfig {
                variable: "u".into(),
                porosity: CoupledInput::Constant(0.5),
            },
            &reg,
        )
        .unwrap();
        assert!((k.compute_qp_residual(&ctx) + 0.5 * ctx.test).abs() < TOL);
        assert!(k.coupled_fields().is_empty());
    }
}
