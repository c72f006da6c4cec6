//! Time-dependent auxiliary values.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::FieldRegistry;
use crate::schedule::{LinearRamp, TemporalSchedule};
use crate::term::{AuxContext, AuxKernel};
use crate::types::FieldId;

/// `LinearChangeInTime`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearChangeInTimeConfig {
    pub variable: String,
    #[serde(default)]
    pub start_time: f64,
    pub end_time: f64,
    pub end_value: f64,
}

/// Ramp from the variable's value at the first evaluation to `end_value`.
#[derive(Clone, Debug)]
pub struct LinearChangeInTime {
    variable: FieldId,
    ramp: LinearRamp,
}

impl LinearChangeInTime {
    const NAME: &'static str = "LinearChangeInTime";

    pub fn new(config: LinearChangeInTimeConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            ramp: LinearRamp::new(Self::NAME, config.start_time, config.end_time, config.end_value),
        })
    }

    pub fn ramp(&self) -> &LinearRamp {
        &self.ramp
    }
}

impl AuxKernel for LinearChangeInTime {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.ramp.value(ctx.time, ctx.current)
    }
}

/// `TemporalStepFunction`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemporalStepFunctionConfig {
    pub variable: String,
    #[serde(default)]
    pub start_value: f64,
    pub aux_vals: Vec<f64>,
    pub aux_times: Vec<f64>,
    #[serde(default)]
    pub time_spans: Vec<f64>,
}

/// Stepwise-with-ramp schedule evaluated at the current time.
#[derive(Clone, Debug)]
pub struct TemporalStepFunction {
    variable: FieldId,
    schedule: TemporalSchedule,
}

impl TemporalStepFunction {
    const NAME: &'static str = "TemporalStepFunction";

    pub fn new(config: TemporalStepFunctionConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            schedule: TemporalSchedule::new(
                Self::NAME,
                config.start_value,
                &config.aux_times,
                &config.aux_vals,
                &config.time_spans,
            )?,
        })
    }
}

impl AuxKernel for TemporalStepFunction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        self.schedule.value_at(ctx.time)
    }
}
