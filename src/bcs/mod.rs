//! Integrated boundary conditions.
//!
//! Boundary conditions implement [`Kernel`](crate::term::Kernel); the
//! host evaluates them at boundary quadrature points with the outward
//! normal set in the context.

mod advective;
mod flux;

pub use advective::{
    AdvectiveBoundary, AdvectiveFluxBCConfig, FirstOrderRecycleBCConfig, InletValue,
    StepwiseInletBCConfig,
};
pub use flux::{
    BoundaryFlux, ConstantFluxBCConfig, CoupledFluxBCConfig, HeatTransferBC, HeatTransferBCConfig,
};
