//! Volumetric kernels.
//!
//! Each family shares one parameterized struct; the named variants are
//! constructors taking their own configuration record.
//!
//! - [`ProductTimeDerivative`]: accumulation terms
//! - [`TensorDiffusion`]: diffusion and conductivity
//! - [`FluxAdvection`], [`NernstPlanckMigration`]: advective and migration flux
//! - [`ReactionKernel`] and the algebraic reaction constraints
//! - [`DirectionalFluxConstraint`]: Darcy/Schlögl velocities and current densities
//! - [`VolumetricTransfer`]: inter-phase exchange
//! - [`WeightedSumKernel`], [`CoupledRatioConstraint`]: pointwise algebraic fields
//! - [`MicroscaleDiffusion`]: 1-D fictitious-mesh diffusion

mod advection;
mod algebraic;
mod diffusion;
mod electrochem;
mod microscale;
mod porous;
mod reaction;
mod time_derivative;
mod transfer;

pub use advection::{AdvectionConfig, FluxAdvection, NernstPlanckMigration, NernstPlanckMigrationConfig};
pub use algebraic::{
    CoupledRatioConfig, CoupledRatioConstraint, ScaledRateSourceConfig, ScaledWeightedSumConfig,
    WeightedSum, WeightedSumConfig, WeightedSumKernel,
};
pub use diffusion::{
    AnisotropicDiffusionConfig, CoupledAnisotropicDiffusionConfig, PhaseThermalConductivityConfig,
    PoreDiffusionConfig, PotentialConductivityConfig, TensorDiffusion, VariableLaplacianConfig,
};
pub use electrochem::{
    Activity, ActivityConfig, ActivityConstraint, ButlerVolmerCurrentDensity, ButlerVolmerRate,
    ElectrodeCurrentConfig, ElectrodeOhmicHeating, ElectrodeOhmicHeatingConfig,
    ElectrolyteCurrentConfig,
};
pub use microscale::{
    MicroscaleCoefTimeDerivativeConfig, MicroscaleDiffusion, MicroscaleDiffusionConfig,
    MicroscaleDiffusionInnerBCConfig, MicroscaleDiffusionOuterBCConfig,
    MicroscaleVariableDiffusionConfig, MicroscaleVariableDiffusionInnerBCConfig,
    MicroscaleVariableDiffusionOuterBCConfig,
};
pub use porous::{
    DarcyVelocityConfig, DirectionalFluxConstraint, GradientTerm, SchloeglVelocityConfig,
};
pub use reaction::{
    InhibitionProducts, InhibitionProductsConfig, LangmuirInhibition, LangmuirInhibitionConfig,
    ReactionConfig, ReactionKernel, ReactionRateConstraint,
};
pub use time_derivative::{
    CoefTimeDerivativeConfig, CoupledCoefTimeDerivativeConfig, PhaseEnergyTimeDerivativeConfig,
    PorousTimeDerivativeConfig, ProductTimeDerivative, VariableCoefTimeDerivativeConfig,
};
pub use transfer::{
    ConstMassTransferConfig, FilmMassTransferConfig, PhaseEnergyTransferConfig, VolumetricTransfer,
};
