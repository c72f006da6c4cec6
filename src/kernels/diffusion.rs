//! Diffusion and conductivity kernels.
//!
//! R = ∇ψ · (c · Π sᵢ · diag(D_x, D_y, D_z)) ∇u
//!
//! The diagonal entries and the scale factors sᵢ (porosity, volume
//! fraction, scalar coefficients) may each be coupled fields. The
//! derivative with respect to a field collects every place it appears:
//!
//! - in a scale factor: c·∂(Π sᵢ)·φ · Σ_k D_k ∂_k u ∂_k ψ
//! - in a diagonal entry k: c·Π sᵢ · φ ∂_k u ∂_k ψ
//! - as the diffused field: c·Π sᵢ · Σ_k D_k ∂_k φ ∂_k ψ

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::params::{
    self, collect_coupled, product, product_derivative, Coupled, CoupledInput, FieldRegistry,
};
use crate::term::{FieldSource, Kernel, QpContext};
use crate::types::FieldId;

/// `AnisotropicDiffusion`: constant diagonal tensor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnisotropicDiffusionConfig {
    pub variable: String,
    /// Diagonal entries (D_x, D_y, D_z)
    pub tensor_coeff: [f64; 3],
}

/// `CoupledAnisotropicDiffusion` and `PorousAnisotropicDiffusion`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoupledAnisotropicDiffusionConfig {
    pub variable: String,
    #[serde(default = "params::zero")]
    pub dx: CoupledInput,
    #[serde(default = "params::zero")]
    pub dy: CoupledInput,
    #[serde(default = "params::zero")]
    pub dz: CoupledInput,
    /// Porosity scale; only used by the porous variant
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
}

/// `VariableLaplacian`: R = ∇ψ · c ∇u
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableLaplacianConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub coupled_coef: CoupledInput,
}

/// `PoreDiffusion` and `VarPoreDiffusion`: R = ∇ψ · ε D ∇u
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoreDiffusionConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub porosity: CoupledInput,
    #[serde(default = "params::one")]
    pub diffusivity: CoupledInput,
}

/// `PhaseThermalConductivity`: R = ∇ψ · (K ε) ∇T
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseThermalConductivityConfig {
    pub variable: String,
    #[serde(default = "params::one")]
    pub specific_heat_conductivity: CoupledInput,
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
}

/// `ElectrodePotentialConductivity` and `ElectrolytePotentialConductivity`:
/// R = ∇ψ · (σ ε) ∇Φ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PotentialConductivityConfig {
    pub variable: String,
    #[serde(default = "default_conductivity")]
    pub conductivity: CoupledInput,
    /// Solid fraction (electrode) or porosity (electrolyte)
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
}

fn default_conductivity() -> CoupledInput {
    CoupledInput::Constant(50.0)
}

/// Diagonal-tensor diffusion with coupled entries and scale factors.
#[derive(Clone, Debug)]
pub struct TensorDiffusion {
    name: &'static str,
    variable: FieldId,
    coefficient: f64,
    diagonal: [Coupled; 3],
    scale: Vec<Coupled>,
}

impl TensorDiffusion {
    /// Build directly from resolved parts.
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        coefficient: f64,
        diagonal: [Coupled; 3],
        scale: Vec<Coupled>,
    ) -> Self {
        debug!("{name}: variable {variable}, diagonal {diagonal:?}");
        Self {
            name,
            variable,
            coefficient,
            diagonal,
            scale,
        }
    }

    fn isotropic(d: Coupled) -> [Coupled; 3] {
        [d, d, d]
    }

    pub fn anisotropic(config: AnisotropicDiffusionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "AnisotropicDiffusion";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let [dx, dy, dz] = config.tensor_coeff;
        let diagonal = [Coupled::Constant(dx), Coupled::Constant(dy), Coupled::Constant(dz)];
        Ok(Self::from_parts(NAME, u, 1.0, diagonal, Vec::new()))
    }

    pub fn coupled_anisotropic(
        config: CoupledAnisotropicDiffusionConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "CoupledAnisotropicDiffusion";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let diagonal = [
            registry.resolve(NAME, &config.dx)?,
            registry.resolve(NAME, &config.dy)?,
            registry.resolve(NAME, &config.dz)?,
        ];
        Ok(Self::from_parts(NAME, u, 1.0, diagonal, Vec::new()))
    }

    pub fn porous_anisotropic(
        config: CoupledAnisotropicDiffusionConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "PorousAnisotropicDiffusion";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let diagonal = [
            registry.resolve(NAME, &config.dx)?,
            registry.resolve(NAME, &config.dy)?,
            registry.resolve(NAME, &config.dz)?,
        ];
        let eps = registry.resolve(NAME, &config.porosity)?;
        Ok(Self::from_parts(NAME, u, 1.0, diagonal, vec![eps]))
    }

    pub fn variable_laplacian(config: VariableLaplacianConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "VariableLaplacian";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let c = registry.resolve(NAME, &config.coupled_coef)?;
        Ok(Self::from_parts(
            NAME,
            u,
            1.0,
            Self::isotropic(Coupled::Constant(1.0)),
            vec![c],
        ))
    }

    /// `PoreDiffusion`: the diffusivity must be a constant.
    pub fn pore(config: PoreDiffusionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "PoreDiffusion";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let d = match &config.diffusivity {
            CoupledInput::Constant(d) => *d,
            CoupledInput::Field(_) => {
                return Err(ConfigurationError::invalid(
                    NAME,
                    "diffusivity must be a constant; use VarPoreDiffusion for a coupled field",
                ))
            }
        };
        let eps = registry.resolve(NAME, &config.porosity)?;
        Ok(Self::from_parts(
            NAME,
            u,
            d,
            Self::isotropic(Coupled::Constant(1.0)),
            vec![eps],
        ))
    }

    pub fn var_pore(config: PoreDiffusionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "VarPoreDiffusion";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let d = registry.resolve(NAME, &config.diffusivity)?;
        let eps = registry.resolve(NAME, &config.porosity)?;
        Ok(Self::from_parts(NAME, u, 1.0, Self::isotropic(d), vec![eps]))
    }

    pub fn phase_thermal_conductivity(
        config: PhaseThermalConductivityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "PhaseThermalConductivity";
        let u = registry.resolve_field(NAME, &config.variable)?;
        let scale = vec![
            registry.resolve(NAME, &config.specific_heat_conductivity)?,
            registry.resolve(NAME, &config.volume_frac)?,
        ];
        Ok(Self::from_parts(
            NAME,
            u,
            1.0,
            Self::isotropic(Coupled::Constant(1.0)),
            scale,
        ))
    }

    pub fn electrode_potential(
        config: PotentialConductivityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        Self::potential("ElectrodePotentialConductivity", config, registry)
    }

    pub fn electrolyte_potential(
        config: PotentialConductivityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        Self::potential("ElectrolytePotentialConductivity", config, registry)
    }

    fn potential(
        name: &'static str,
        config: PotentialConductivityConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        let u = registry.resolve_field(name, &config.variable)?;
        let scale = vec![
            registry.resolve(name, &config.conductivity)?,
            registry.resolve(name, &config.volume_frac)?,
        ];
        Ok(Self::from_parts(
            name,
            u,
            1.0,
            Self::isotropic(Coupled::Constant(1.0)),
            scale,
        ))
    }

    #[inline]
    fn tensor<S: FieldSource>(&self, source: &S) -> Vector3<f64> {
        Vector3::new(
            self.diagonal[0].value(source),
            self.diagonal[1].value(source),
            self.diagonal[2].value(source),
        )
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let grad_u = ctx.fields[self.variable].gradient;
        let d = self.tensor(ctx);
        let s = self.coefficient * product(&self.scale, ctx);

        let flux = d.component_mul(&grad_u).dot(&ctx.grad_test);
        let mut total = self.coefficient * product_derivative(&self.scale, ctx, wrt) * ctx.phi * flux;

        for (k, entry) in self.diagonal.iter().enumerate() {
            if entry.is(wrt) {
                total += s * ctx.phi * grad_u[k] * ctx.grad_test[k];
            }
        }

        if wrt == self.variable {
            total += s * d.component_mul(&ctx.grad_phi).dot(&ctx.grad_test);
        }
        total
    }
}

impl Kernel for TensorDiffusion {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let grad_u = ctx.fields[self.variable].gradient;
        let s = self.coefficient * product(&self.scale, ctx);
        s * self.tensor(ctx).component_mul(&grad_u).dot(&ctx.grad_test)
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.diagonal.iter().chain(&self.scale))
    }
}
