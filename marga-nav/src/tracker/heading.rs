//! Heading extraction from the rotation-vector sensor.
//!
//! The quaternion is reduced to a yaw angle in degrees, a fixed
//! calibration offset is added, and the result is optionally remapped
//! through the environment-north calibration so headings live in plan
//! space rather than compass space.

use crate::config::TrackerConfig;

pub struct HeadingFilter {
    offset_deg: f32,
    environment_north_deg: Option<f32>,
}

impl HeadingFilter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            offset_deg: config.heading_offset_deg,
            environment_north_deg: config.environment_north_deg,
        }
    }

    /// Convert a rotation-vector quaternion to a plan-space heading in
    /// degrees, normalized to [0, 360).
    pub fn heading_deg(&self, x: f32, y: f32, z: f32, w: f32) -> f32 {
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        if norm < 1e-9 {
            return self.remap(self.offset_deg);
        }
        let (x, y, z, w) = (x / norm, y / norm, z / norm, w / norm);

        // Yaw from the rotation matrix: atan2(m10, m00)
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
        self.remap(yaw.to_degrees() + self.offset_deg)
    }

    fn remap(&self, deg: f32) -> f32 {
        let deg = deg.rem_euclid(360.0);
        match self.environment_north_deg {
            Some(north) => (deg - north + 360.0).rem_euclid(360.0),
            None => deg,
        }
    }
}
