//! Electrochemistry shared by kernels, auxiliary evaluators, and initial
//! conditions.
//!
//! Functions here are the single source of truth for each relation; the
//! kernel that constrains a relation and the initial condition that seeds
//! it both evaluate the same code.

mod butler_volmer;
mod electrolyte;

pub use butler_volmer::{ButlerVolmer, ButlerVolmerRateConfig, CurrentDensity, CurrentDensityConfig};
pub use electrolyte::{davies_activity_coefficient, IonSet, DAVIES_A};
