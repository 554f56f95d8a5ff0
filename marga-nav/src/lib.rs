//! # Marga-Nav: Navigation Runtime
//!
//! Runtime services on top of [`marga_map`]:
//!
//! - [`tracker`]: Pedestrian dead-reckoning from accelerometer,
//!   rotation-vector, and hardware step events, fed over a channel to
//!   a single consumer thread
//! - [`worker`]: Background path computation with single-flight
//!   cancellation semantics
//! - [`shared`]: Lock-free shared state between the tracker writer and
//!   its readers
//! - [`config`]: TOML configuration with per-field defaults
//!
//! Pathfinding itself lives in `marga-map`; this crate owns the
//! threads, channels, and sensor plumbing around it.

pub mod config;
pub mod error;
pub mod shared;
pub mod tracker;
pub mod worker;

pub use config::{NavConfig, TrackerConfig};
pub use error::{NavError, Result};
pub use shared::TrackerState;
pub use tracker::{DeadReckoningTracker, SensorSample};
pub use worker::SafePathFinder;
