//! Reaction kinetics shared by reaction, energy-transfer, and rate-constraint
//! kernels.
//!
//! Kinetics are composed rather than inherited: a [`ReactionKinetics`]
//! pairs a [`RateLaw`] (how the rate constants are computed) with a
//! [`ScaleFactor`] (how the rate enters a balance equation).

mod arrhenius;
mod rate_law;
mod reaction;

pub use arrhenius::Arrhenius;
pub use rate_law::RateLaw;
pub use reaction::{ReactionKinetics, ScaleFactor};
