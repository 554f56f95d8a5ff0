//! Step detection from raw accelerometer samples.
//!
//! An exponential low-pass filter tracks gravity; the residual
//! linear-acceleration magnitude drives the detector. A step is
//! accepted when the magnitude changed meaningfully since the previous
//! sample, the middle of the last three magnitudes is a local peak or
//! valley, and the minimum inter-step interval has elapsed. A hardware
//! step event bypasses the filter but honors the same interval gate.

use crate::config::TrackerConfig;

pub struct StepDetector {
    accel_threshold: f32,
    gravity_alpha: f32,
    min_interval_ms: u64,
    gravity: [f32; 3],
    initialized: bool,
    last_magnitude: f32,
    recent: [f32; 3],
    samples: usize,
    last_step_ms: Option<u64>,
}

impl StepDetector {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            accel_threshold: config.accel_threshold,
            gravity_alpha: config.gravity_alpha,
            min_interval_ms: config.min_step_interval_ms,
            gravity: [0.0; 3],
            initialized: false,
            last_magnitude: 0.0,
            recent: [0.0; 3],
            samples: 0,
            last_step_ms: None,
        }
    }

    /// Feed one accelerometer sample. Returns true when the sample
    /// completes a step.
    pub fn on_accelerometer(&mut self, x: f32, y: f32, z: f32, timestamp_ms: u64) -> bool {
        let raw = [x, y, z];
        if !self.initialized {
            self.gravity = raw;
            self.initialized = true;
        } else {
            for axis in 0..3 {
                self.gravity[axis] = self.gravity_alpha * self.gravity[axis]
                    + (1.0 - self.gravity_alpha) * raw[axis];
            }
        }

        let linear = [raw[0] - self.gravity[0], raw[1] - self.gravity[1], raw[2] - self.gravity[2]];
        let magnitude =
            (linear[0] * linear[0] + linear[1] * linear[1] + linear[2] * linear[2]).sqrt();

        let delta = (magnitude - self.last_magnitude).abs();
        self.last_magnitude = magnitude;

        self.recent = [self.recent[1], self.recent[2], magnitude];
        self.samples += 1;

        if self.samples < 3 || delta <= self.accel_threshold {
            return false;
        }
        if !self.peak_or_valley() {
            return false;
        }
        self.try_accept(timestamp_ms)
    }

    /// Feed a hardware step-detector event. Only the interval gate
    /// applies.
    pub fn on_hardware_step(&mut self, timestamp_ms: u64) -> bool {
        self.try_accept(timestamp_ms)
    }

    /// Middle of the last three magnitudes is a local extremum
    fn peak_or_valley(&self) -> bool {
        let [a, b, c] = self.recent;
        (a < b && b > c) || (a > b && b < c)
    }

    fn try_accept(&mut self, timestamp_ms: u64) -> bool {
        if let Some(last) = self.last_step_ms {
            if timestamp_ms.saturating_sub(last) < self.min_interval_ms {
                return false;
            }
        }
        self.last_step_ms = Some(timestamp_ms);
        true
    }
}
