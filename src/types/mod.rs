//! Strongly-typed domain types for safer APIs.
//!
//! - Index newtypes keep field, postprocessor, and microscale node indices apart
//! - Unit-tagged quantities make CGS/SI conversions explicit
//! - [`CoordinateSystem`] names the radial geometry of microscale meshes
//!
//! # Example
//!
//! ```
//! use fe_kernels::types::{Diffusivity, FieldId, Length};
//!
//! let field = FieldId::new(0);
//! let pore = Length::from_centimeters(1e-5);
//! let d = Diffusivity::from_cm2_per_s(0.2);
//! assert_eq!(field.get(), 0);
//! assert!(pore.meters() < 1e-6);
//! assert!(d.m2_per_s() < 1e-4);
//! ```

mod coordinates;
mod indices;
mod units;

pub use coordinates::CoordinateSystem;
pub use indices::{FieldId, MicroNodeIndex, PostprocessorId};
pub use units::{
    Concentration, Diffusivity, Length, MolarMass, Pressure, Viscosity, KG_PER_G, M2_PER_CM2,
    MOL_M3_PER_MOL_L, M_PER_CM, PA_PER_ATM, PA_PER_KPA, PA_S_PER_POISE,
};
