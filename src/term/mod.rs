//! The local term contract between physics terms and the host's assembly loop.
//!
//! - [`QpContext`], [`AuxContext`], [`InterfaceContext`]: per-point state
//!   supplied fresh by the host on every call
//! - [`Kernel`]: volumetric and integrated-boundary residual/Jacobian terms
//! - [`InterfaceKernel`]: two-sided terms across a subdomain boundary
//! - [`AuxKernel`]: derived-quantity evaluators
//! - [`InitialCondition`]: value-only initial states
//! - [`Material`]: per-point property providers
//! - [`CombinedKernel`]: composition helper

mod auxiliary;
mod context;
mod interface;
mod kernel;
mod material;

pub use auxiliary::{AuxKernel, InitialCondition};
pub use context::{
    AuxContext, FieldSource, FieldValue, InterfaceContext, JacobianBlock, QpContext, Side,
};
pub use interface::InterfaceKernel;
pub use kernel::{CombinedKernel, Kernel};
pub use material::Material;
