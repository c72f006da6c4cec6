//! Linear ramp between a captured start value and a target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use log::{debug, warn};

/// Linear change in time from a captured start value to `end_value`.
///
/// The start value is captured from the first evaluation at or before
/// `start_time`. Capture is first-writer-wins and happens exactly once, so
/// the ramp is safe to evaluate from several threads. Evaluations after
/// `start_time` with nothing captured ramp from the present value without
/// capturing it, and warn once.
///
/// - t ≤ start_time: start value
/// - t ≥ end_time: end value
/// - otherwise: linear interpolation
#[derive(Debug)]
pub struct LinearRamp {
    object: &'static str,
    start_time: f64,
    end_time: f64,
    end_value: f64,
    start_value: OnceLock<f64>,
    late_warned: AtomicBool,
}

impl LinearRamp {
    /// Create a ramp.
    ///
    /// If `end_time <= start_time` the end time is clamped to
    /// `start_time * 1.01` and a warning is logged.
    pub fn new(object: &'static str, start_time: f64, end_time: f64, end_value: f64) -> Self {
        let end_time = if end_time <= start_time {
            let clamped = start_time * 1.01;
            warn!(
                "{object}: end_time {end_time} <= start_time {start_time}, clamping to {clamped}"
            );
            clamped
        } else {
            end_time
        };
        debug!("{object}: ramp {start_time} -> {end_time} to {end_value}");
        Self {
            object,
            start_time,
            end_time,
            end_value,
            start_value: OnceLock::new(),
            late_warned: AtomicBool::new(false),
        }
    }

    /// Start of the ramp window.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the ramp window (after clamping).
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// The captured start value, if an evaluation at or before
    /// `start_time` has happened yet.
    pub fn start_value(&self) -> Option<f64> {
        self.start_value.get().copied()
    }

    /// Value at time `t`. `current` is the quantity's present value, used
    /// for the one-time capture.
    pub fn value(&self, t: f64, current: f64) -> f64 {
        if t <= self.start_time {
            return *self.start_value.get_or_init(|| current);
        }
        let start = match self.start_value.get() {
            Some(start) => *start,
            None => {
                if !self.late_warned.swap(true, Ordering::Relaxed) {
                    warn!(
                        "{}: first evaluation at t = {t} is after start_time {}, \
                         ramping from the present value {current}",
                        self.object, self.start_time
                    );
                }
                current
            }
        };
        if t >= self.end_time {
            return self.end_value;
        }
        let fraction = (t - self.start_time) / (self.end_time - self.start_time);
        start + (self.end_value - start) * fraction
    }
}

impl Clone for LinearRamp {
    fn clone(&self) -> Self {
        let start_value = OnceLock::new();
        if let Some(v) = self.start_value.get() {
            let _ = start_value.set(*v);
        }
        Self {
            object: self.object,
            start_time: self.start_time,
            end_time: self.end_time,
            end_value: self.end_value,
            start_value,
            late_warned: AtomicBool::new(self.late_warned.load(Ordering::Relaxed)),
        }
    }
}
