//! Stepwise-with-ramp schedules.
//!
//! A schedule is a start value followed by steps `(time, value, span)`.
//! At `time` the output starts moving linearly from the previous plateau
//! to `value`, reaching it at `time + span`; a zero span is a jump.
//!
//! Evaluation recomputes from `t` alone, so evaluating at an earlier time
//! after a rejected step gives the same answer as the first time.

use log::debug;

use crate::error::{ConfigurationError, Result};
use crate::params::{check_lengths, check_non_negative};

/// One scheduled change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleStep {
    /// Time the change starts
    pub time: f64,
    /// Plateau value after the change
    pub value: f64,
    /// Ramp duration (0 for a jump)
    pub span: f64,
}

/// Piecewise-linear-with-plateaus function of time.
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalSchedule {
    start_value: f64,
    steps: Vec<ScheduleStep>,
}

impl TemporalSchedule {
    /// Build a schedule from parallel lists.
    ///
    /// `spans` may be empty (all jumps). Times must be non-decreasing and
    /// each ramp must finish before the next step starts.
    pub fn new(
        object: &'static str,
        start_value: f64,
        times: &[f64],
        values: &[f64],
        spans: &[f64],
    ) -> Result<Self> {
        check_lengths(object, "times", times.len(), "values", values.len())?;
        let spans: Vec<f64> = if spans.is_empty() {
            vec![0.0; times.len()]
        } else {
            check_lengths(object, "times", times.len(), "time_spans", spans.len())?;
            spans.to_vec()
        };

        let mut steps: Vec<ScheduleStep> = Vec::with_capacity(times.len());
        for ((&time, &value), &span) in times.iter().zip(values).zip(&spans) {
            check_non_negative(object, "time_spans", span)?;
            if let Some(prev) = steps.last().copied() {
                if time < prev.time {
                    return Err(ConfigurationError::invalid(
                        object,
                        format!("times must be non-decreasing ({} after {})", time, prev.time),
                    ));
                }
                if prev.time + prev.span > time {
                    return Err(ConfigurationError::invalid(
                        object,
                        format!(
                            "ramp starting at {} overlaps the step at {}",
                            prev.time, time
                        ),
                    ));
                }
            }
            steps.push(ScheduleStep { time, value, span });
        }

        debug!("{object}: schedule with {} steps", steps.len());
        Ok(Self { start_value, steps })
    }

    /// Value before the first step.
    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    /// The scheduled steps.
    pub fn steps(&self) -> &[ScheduleStep] {
        &self.steps
    }

    /// Value at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        let mut current = self.start_value;
        for step in &self.steps {
            if t < step.time {
                break;
            }
            if t < step.time + step.span {
                return current + (step.value - current) * (t - step.time) / step.span;
            }
            current = step.value;
        }
        current
    }
}
