//! Point and coordinate types shared by the graph and grid engines.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Plan-space coordinate (plan units, f32).
///
/// The unit is whatever the floor plan was authored in; all distances
/// and thresholds are expressed in the same unit.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in plan units
    pub x: f32,
    /// Y coordinate in plan units
    pub y: f32,
}

impl Point2D {
    /// Create a new point
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance (faster, avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Length (magnitude) of this point as a vector from origin
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize to unit length
    #[inline]
    pub fn normalize(&self) -> Point2D {
        let len = self.length();
        if len > 0.0 {
            Point2D::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product with another point (as vectors)
    #[inline]
    pub fn dot(&self, other: &Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (z-component of 3D cross product)
    #[inline]
    pub fn cross(&self, other: &Point2D) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

/// Grid coordinates (integer cell indices) for the rasterized engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the 8 neighbors (including diagonals).
    ///
    /// The first 4 entries are cardinal moves, the last 4 diagonal;
    /// the A* engine relies on that ordering for move costs.
    #[inline]
    pub fn neighbors_8(&self) -> [GridCoord; 8] {
        [
            GridCoord::new(self.x, self.y + 1),     // N
            GridCoord::new(self.x + 1, self.y),     // E
            GridCoord::new(self.x, self.y - 1),     // S
            GridCoord::new(self.x - 1, self.y),     // W
            GridCoord::new(self.x + 1, self.y + 1), // NE
            GridCoord::new(self.x + 1, self.y - 1), // SE
            GridCoord::new(self.x - 1, self.y - 1), // SW
            GridCoord::new(self.x - 1, self.y + 1), // NW
        ]
    }
}

/// Axis-aligned bounding rectangle in plan units
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower-left corner
    pub min: Point2D,
    /// Upper-right corner
    pub max: Point2D,
}

impl Bounds {
    /// Create from corner points
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Smallest bounds containing all given points (None if empty)
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    /// Width in plan units
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height in plan units
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether a point lies inside (boundary inclusive)
    #[inline]
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_ops() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, -1.0);
        assert_eq!(a + b, Point2D::new(4.0, 1.0));
        assert_eq!(b - a, Point2D::new(2.0, -3.0));
        assert_eq!(a * 2.0, Point2D::new(2.0, 4.0));
    }

    #[test]
    fn test_neighbors_8_ordering() {
        let c = GridCoord::new(5, 5);
        let n = c.neighbors_8();
        // Cardinals first, diagonals last
        assert_eq!(n[0], GridCoord::new(5, 6));
        assert_eq!(n[3], GridCoord::new(4, 5));
        assert_eq!(n[4], GridCoord::new(6, 6));
        assert_eq!(n[7], GridCoord::new(4, 6));
    }

    #[test]
    fn test_bounds_from_points() {
        let b = Bounds::from_points(&[
            Point2D::new(2.0, 5.0),
            Point2D::new(-1.0, 0.5),
            Point2D::new(4.0, 3.0),
        ])
        .unwrap();
        assert_eq!(b.min, Point2D::new(-1.0, 0.5));
        assert_eq!(b.max, Point2D::new(4.0, 5.0));
        assert!(b.contains(Point2D::new(0.0, 1.0)));
        assert!(!b.contains(Point2D::new(5.0, 1.0)));
    }
}
