//! Fundamental types and geometry primitives.

pub mod geometry;
pub mod point;

pub use geometry::{
    distance_point_to_segment, point_in_polygon, polygon_centroid, segment_intersects_polygon,
    segments_intersect,
};
pub use point::{Bounds, GridCoord, Point2D};
