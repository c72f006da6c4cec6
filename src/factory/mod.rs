//! Declarative construction of terms from input blocks.
//!
//! Each object category has a closed enum tagged by `type`, so an input
//! block such as
//!
//! ```toml
//! type = "PoreDiffusion"
//! variable = "c"
//! porosity = "eps"
//! diffusivity = 1.5e-9
//! ```
//!
//! deserializes into the variant carrying that term's configuration.
//! [`KernelConfig::build`] and its siblings resolve field names and return
//! the boxed term.

mod catalogue;
mod deck;

pub use catalogue::{
    AuxKernelConfig, BoundaryConditionConfig, InitialConditionConfig, InterfaceKernelConfig,
    KernelConfig,
};
pub use deck::{InputDeck, Terms};
