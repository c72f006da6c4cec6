//! # fe-kernels
//!
//! Local residual and Jacobian terms for finite-element models of porous
//! media, reactive transport, and electrochemistry.
//!
//! This crate provides the per-quadrature-point building blocks a
//! finite-element host assembles into global systems:
//! - The evaluation contract (contexts, `Kernel`, `AuxKernel`, ...)
//! - Time derivative, diffusion, and advection kernels
//! - Arrhenius and Butler–Volmer reaction kernels
//! - Interface transfer between subdomains
//! - Microscale diffusion on a fictitious 1-D mesh
//! - Auxiliary evaluators and initial conditions
//! - Temporal input schedules (ramps, stepwise inlets, recycle)
//! - A finite-difference Jacobian checker
//!
//! The host owns the mesh, shape functions, and solver. Every term is
//! constructed once from a configuration record and a [`FieldRegistry`],
//! then evaluated through borrowed per-point contexts.

pub mod assembly;
pub mod aux_kernels;
pub mod bcs;
pub mod constants;
pub mod electrochem;
pub mod error;
pub mod factory;
pub mod ics;
pub mod interface;
pub mod kernels;
pub mod kinetics;
pub mod materials;
pub mod microscale;
pub mod params;
pub mod schedule;
pub mod term;
pub mod types;
pub mod verify;

// Re-export main types for convenience
pub use assembly::{evaluate, evaluate_batch, LocalContribution};
#[cfg(feature = "parallel")]
pub use assembly::evaluate_batch_parallel;
pub use constants::{FARADAY, GAS_CONSTANT};
pub use error::{ConfigurationError, Result};
pub use factory::{
    AuxKernelConfig, BoundaryConditionConfig, InitialConditionConfig, InputDeck,
    InterfaceKernelConfig, KernelConfig, Terms,
};
pub use params::{Coupled, CoupledInput, FieldRegistry};
pub use term::{
    AuxContext, AuxKernel, CombinedKernel, FieldSource, FieldValue, InitialCondition,
    InterfaceContext, InterfaceKernel, JacobianBlock, Kernel, Material, QpContext, Side,
};
pub use types::{CoordinateSystem, FieldId, PostprocessorId};
pub use verify::{check_interface_kernel, check_kernel, JacobianCheck, JacobianReport};
