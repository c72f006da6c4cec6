//! Auxiliary evaluators: pointwise derived quantities with no residual.
//!
//! An aux evaluator computes one value per point from coupled fields,
//! postprocessors, and time. The host stores the result in an auxiliary
//! field; no Jacobian contribution exists.

mod coupled;
mod electrochem;
mod gas;
mod microscale;
mod porous;
mod temporal;

pub use coupled::{
    CoupledRatio, CoupledSumFunctionConfig, FirstOrderRecycle, FirstOrderRecycleConfig,
    InhibitionProductsAux, LinearCombination, LinearCombinationConfig, VectorMagnitude,
    VectorMagnitudeConfig,
};
pub use electrochem::{
    DaviesActivityCoefficient, DaviesActivityCoefficientConfig, ElectrodeCurrentDensity,
    ElectrolyteConductivity, ElectrolyteConductivityConfig, IonicStrength, IonicStrengthConfig,
};
pub use gas::{
    GasFlowConfig, GasPoreDiffusivityConfig, GasProperty, GasPropertyAux, GasPropertyConfig,
    GasSpeciesPropertyConfig,
};
pub use microscale::{MicroscaleIntegral, MicroscaleIntegralConfig};
pub use porous::{
    renkin_factor, AverageLinearVelocity, AverageLinearVelocityConfig, DarcyCoefficient,
    DarcyWeisbachConfig, EffectiveDiffusivity, EffectiveDiffusivityConfig, HinderedDiffusivity,
    HinderedDiffusivityConfig, KozenyCarmanConfig, SchloeglDarcyConfig,
    SchloeglElectrokineticConfig,
};
pub use temporal::{
    LinearChangeInTime, LinearChangeInTimeConfig, TemporalStepFunction, TemporalStepFunctionConfig,
};
