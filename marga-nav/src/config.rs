//! Configuration loading for MargaNav

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Dead-reckoning tracker tuning
#[derive(Clone, Debug, Deserialize)]
pub struct TrackerConfig {
    /// Nominal stride length in meters (default: 1.0)
    #[serde(default = "default_step_length")]
    pub step_length: f32,

    /// How much a blocked step is shortened per retry, meters
    /// (default: 0.1)
    #[serde(default = "default_step_decrement")]
    pub step_decrement: f32,

    /// Shortest stride still applied, meters (default: 0.2)
    #[serde(default = "default_min_step_length")]
    pub min_step_length: f32,

    /// Acceleration-magnitude delta that counts as a step candidate,
    /// m/s^2 (default: 1.8)
    #[serde(default = "default_accel_threshold")]
    pub accel_threshold: f32,

    /// Low-pass coefficient for the gravity estimate (default: 0.8)
    #[serde(default = "default_gravity_alpha")]
    pub gravity_alpha: f32,

    /// Minimum interval between accepted steps, milliseconds
    /// (default: 250)
    #[serde(default = "default_min_step_interval_ms")]
    pub min_step_interval_ms: u64,

    /// Fixed heading correction applied to every sample, degrees
    /// (default: 0.0)
    #[serde(default)]
    pub heading_offset_deg: f32,

    /// Compass bearing of the plan's +x axis; set to remap device
    /// headings into plan space (default: unset, no remapping)
    #[serde(default)]
    pub environment_north_deg: Option<f32>,
}

fn default_step_length() -> f32 {
    1.0
}

fn default_step_decrement() -> f32 {
    0.1
}

fn default_min_step_length() -> f32 {
    0.2
}

fn default_accel_threshold() -> f32 {
    1.8
}

fn default_gravity_alpha() -> f32 {
    0.8
}

fn default_min_step_interval_ms() -> u64 {
    250
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            step_length: default_step_length(),
            step_decrement: default_step_decrement(),
            min_step_length: default_min_step_length(),
            accel_threshold: default_accel_threshold(),
            gravity_alpha: default_gravity_alpha(),
            min_step_interval_ms: default_min_step_interval_ms(),
            heading_offset_deg: 0.0,
            environment_north_deg: None,
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: NavConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { tracker: TrackerConfig::default() }
    }
}
