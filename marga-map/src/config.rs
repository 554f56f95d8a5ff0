//! Configuration for graph construction, routing, and rasterization.
//!
//! The tuning values here came from the deployed floor plans; none of
//! them is derived, so they stay configurable rather than hard-coded.

use serde::Deserialize;

/// Pathfinding and rasterization parameters
#[derive(Clone, Debug, Deserialize)]
pub struct MapConfig {
    /// Weight multiplier for edges crossing a danger zone (default: 10.0)
    #[serde(default = "default_risk_multiplier")]
    pub risk_multiplier: f32,

    /// Maximum radius when linking a free coordinate outside any room
    /// to nearby graph nodes, in plan units (default: 3.0)
    #[serde(default = "default_connect_radius")]
    pub connect_radius: f32,

    /// How many nearby nodes a free coordinate outside any room
    /// connects to (default: 2)
    #[serde(default = "default_temp_link_count")]
    pub temp_link_count: usize,

    /// Grid cell edge length in plan units (default: 0.25)
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    /// Half-width of the square kept clear around each POI when
    /// rasterizing (default: 0.5)
    #[serde(default = "default_poi_buffer")]
    pub poi_buffer: f32,

    /// Corner fillet radius for path smoothing (default: 0.5)
    #[serde(default = "default_rounding_radius")]
    pub rounding_radius: f32,

    /// Points per corner fillet arc (default: 5)
    #[serde(default = "default_arc_points")]
    pub arc_points: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            risk_multiplier: default_risk_multiplier(),
            connect_radius: default_connect_radius(),
            temp_link_count: default_temp_link_count(),
            cell_size: default_cell_size(),
            poi_buffer: default_poi_buffer(),
            rounding_radius: default_rounding_radius(),
            arc_points: default_arc_points(),
        }
    }
}

fn default_risk_multiplier() -> f32 {
    10.0
}
fn default_connect_radius() -> f32 {
    3.0
}
fn default_temp_link_count() -> usize {
    2
}
fn default_cell_size() -> f32 {
    0.25
}
fn default_poi_buffer() -> f32 {
    0.5
}
fn default_rounding_radius() -> f32 {
    0.5
}
fn default_arc_points() -> usize {
    5
}
