//! Floor-plan model: the immutable snapshot handed to both pathfinding
//! engines and the position tracker.
//!
//! The plan is produced once by an external loader. Nothing in this
//! crate mutates it after construction.

use crate::core::{geometry, Point2D};
use serde::{Deserialize, Serialize};

/// Zone kind whose crossing edges are weight-penalized.
pub const DANGER_ZONE: &str = "danger";

/// A thick line segment. Used both as room-boundary geometry and as a
/// rasterization obstacle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub start: Point2D,
    pub end: Point2D,
    pub thickness: f32,
}

/// A named room polygon with a precomputed center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Ordered vertices (>= 3, implicitly closed)
    pub polygon: Vec<Point2D>,
    pub name: String,
    pub center: Point2D,
}

impl Room {
    /// Boundary-inclusive containment test
    pub fn contains(&self, p: Point2D) -> bool {
        geometry::point_in_polygon(p.x, p.y, &self.polygon)
    }
}

/// A polygon region with a kind tag; [`DANGER_ZONE`] penalizes routes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub polygon: Vec<Point2D>,
    pub kind: String,
    pub center: Point2D,
}

impl Zone {
    /// Whether this zone penalizes crossing edges
    #[inline]
    pub fn is_danger(&self) -> bool {
        self.kind == DANGER_ZONE
    }
}

/// Named point of interest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub position: Point2D,
}

/// Door, identified by its coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub position: Point2D,
}

/// Window, identified by its coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub position: Point2D,
}

/// Aggregate floor-plan snapshot.
///
/// `min_point` is the lower-left bound of the plan, used to translate
/// tracker-local coordinates into plan coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub walls: Vec<Wall>,
    pub rooms: Vec<Room>,
    pub zones: Vec<Zone>,
    pub pois: Vec<Poi>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub min_point: Point2D,
}

impl FloorPlan {
    /// First room whose polygon contains the point (boundary inclusive)
    pub fn room_containing(&self, p: Point2D) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains(p))
    }

    /// Look up a POI by name
    pub fn poi(&self, name: &str) -> Option<&Poi> {
        self.pois.iter().find(|p| p.name == name)
    }

    /// Translate a tracker-local coordinate into plan coordinates
    #[inline]
    pub fn to_plan_coords(&self, local: Point2D) -> Point2D {
        local + self.min_point
    }

    /// Approximate outer boundary of the building: all wall endpoints
    /// ordered by angle around their centroid.
    ///
    /// This is the containment polygon the dead-reckoning tracker checks
    /// candidate positions against. Empty when the plan has no walls.
    pub fn outer_polygon(&self) -> Vec<Point2D> {
        let mut points: Vec<Point2D> = Vec::with_capacity(self.walls.len() * 2);
        for wall in &self.walls {
            points.push(wall.start);
            points.push(wall.end);
        }
        if points.is_empty() {
            return points;
        }

        let centroid = geometry::polygon_centroid(&points);
        points.sort_by(|a, b| {
            let aa = (a.y - centroid.y).atan2(a.x - centroid.x);
            let ab = (b.y - centroid.y).atan2(b.x - centroid.x);
            aa.total_cmp(&ab)
        });
        // Shared wall corners appear twice; keep one of each
        points.dedup_by(|a, b| a.distance(b) < 1e-6);
        points
    }
}
