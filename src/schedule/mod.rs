//! Time-dependent inputs.
//!
//! - [`LinearRamp`]: captured start value ramped linearly to a target
//! - [`TemporalSchedule`]: plateaus joined by jumps or linear ramps
//! - [`first_order_recycle`]: implicit-Euler inlet recycle update

mod ramp;
mod recycle;
mod stepwise;

pub use ramp::LinearRamp;
pub use recycle::first_order_recycle;
pub use stepwise::{ScheduleStep, TemporalSchedule};
