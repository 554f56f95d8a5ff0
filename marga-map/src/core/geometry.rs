//! Computational-geometry primitives.
//!
//! All functions are total over finite inputs: degenerate polygons
//! (fewer than 3 vertices) test as "outside" and zero-length segments
//! fall back to point distance. Nothing here panics.

use super::point::Point2D;

/// Orientation of the ordered triplet (p, q, r).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Point2D, q: Point2D, r: Point2D) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether q lies on the segment p-r, assuming the three are collinear.
fn on_segment(p: Point2D, q: Point2D, r: Point2D) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Segment intersection test for p1-p2 against p3-p4.
///
/// Handles the collinear-overlap cases explicitly; touching endpoints
/// count as intersecting.
pub fn segments_intersect(p1: Point2D, p2: Point2D, p3: Point2D, p4: Point2D) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear special cases
    (o1 == Orientation::Collinear && on_segment(p1, p3, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, p4, p2))
        || (o3 == Orientation::Collinear && on_segment(p3, p1, p4))
        || (o4 == Orientation::Collinear && on_segment(p3, p2, p4))
}

/// Ray-casting point-in-polygon test with boundary inclusion.
///
/// A point exactly on an edge or coincident with a vertex classifies as
/// inside. This boundary-inclusive policy is a contract: doors sit on
/// shared room walls and must count as belonging to both rooms.
/// Polygons with fewer than 3 vertices always return false.
pub fn point_in_polygon(x: f32, y: f32, polygon: &[Point2D]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let p = Point2D::new(x, y);
    let n = polygon.len();

    // Boundary check first so degenerate (zero-length) edges are not dropped
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[j];
        let b = polygon[i];
        if orientation(a, p, b) == Orientation::Collinear && on_segment(a, p, b) {
            return true;
        }
        j = i;
    }

    // Standard even-odd crossing count
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > y) != (b.y > y) {
            let x_cross = (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Projection-clamped distance from a point to a segment.
pub fn distance_point_to_segment(p: Point2D, a: Point2D, b: Point2D) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-12 {
        // Segment is a point
        return p.distance(&a);
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = Point2D::new(a.x + t * dx, a.y + t * dy);
    p.distance(&proj)
}

/// Mean of the polygon vertices. Returns the origin for an empty polygon.
pub fn polygon_centroid(polygon: &[Point2D]) -> Point2D {
    if polygon.is_empty() {
        return Point2D::ZERO;
    }
    let mut sum = Point2D::ZERO;
    for p in polygon {
        sum = sum + *p;
    }
    sum * (1.0 / polygon.len() as f32)
}

/// Whether a segment crosses a polygon: it intersects any polygon edge,
/// or either endpoint lies inside.
pub fn segment_intersects_polygon(a: Point2D, b: Point2D, polygon: &[Point2D]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        if segments_intersect(a, b, polygon[j], polygon[i]) {
            return true;
        }
        j = i;
    }
    point_in_polygon(a.x, a.y, polygon) || point_in_polygon(b.x, b.y, polygon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_in_polygon_interior() {
        let sq = unit_square();
        assert!(point_in_polygon(5.0, 5.0, &sq));
        assert!(!point_in_polygon(15.0, 5.0, &sq));
        assert!(!point_in_polygon(-0.1, 5.0, &sq));
    }

    #[test]
    fn test_point_in_polygon_boundary_inclusive() {
        let sq = unit_square();
        // On edge
        assert!(point_in_polygon(5.0, 0.0, &sq));
        assert!(point_in_polygon(10.0, 5.0, &sq));
        // On vertex
        assert!(point_in_polygon(0.0, 0.0, &sq));
        assert!(point_in_polygon(10.0, 10.0, &sq));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
        assert!(!point_in_polygon(
            0.0,
            0.0,
            &[Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)]
        ));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // L-shape; the notch must be outside
        let poly = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 4.0),
            Point2D::new(2.0, 4.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(1.0, 1.0, &poly));
        assert!(point_in_polygon(3.0, 3.0, &poly));
        assert!(!point_in_polygon(1.0, 3.0, &poly));
    }

    #[test]
    fn test_segments_intersect_crossing() {
        assert!(segments_intersect(
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 2.0),
            Point2D::new(2.0, 0.0),
        ));
    }

    #[test]
    fn test_segments_intersect_disjoint() {
        assert!(!segments_intersect(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(1.0, 1.0),
        ));
    }

    #[test]
    fn test_segments_intersect_collinear_overlap() {
        assert!(segments_intersect(
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(6.0, 0.0),
        ));
        assert!(!segments_intersect(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(3.0, 0.0),
        ));
    }

    #[test]
    fn test_segments_intersect_touching_endpoint() {
        assert!(segments_intersect(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 0.0),
        ));
    }

    #[test]
    fn test_distance_point_to_segment() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, 0.0);
        // Perpendicular projection
        assert!((distance_point_to_segment(Point2D::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        // Clamped to endpoint
        assert!((distance_point_to_segment(Point2D::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
        // Degenerate segment
        assert!((distance_point_to_segment(Point2D::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_centroid() {
        let c = polygon_centroid(&unit_square());
        assert!((c.x - 5.0).abs() < 1e-6);
        assert!((c.y - 5.0).abs() < 1e-6);
        assert_eq!(polygon_centroid(&[]), Point2D::ZERO);
    }

    #[test]
    fn test_segment_intersects_polygon() {
        let sq = unit_square();
        // Straight through
        assert!(segment_intersects_polygon(
            Point2D::new(-5.0, 5.0),
            Point2D::new(15.0, 5.0),
            &sq
        ));
        // Fully inside (no edge crossing)
        assert!(segment_intersects_polygon(
            Point2D::new(2.0, 2.0),
            Point2D::new(8.0, 8.0),
            &sq
        ));
        // Fully outside
        assert!(!segment_intersects_polygon(
            Point2D::new(-5.0, -5.0),
            Point2D::new(-1.0, -1.0),
            &sq
        ));
    }
}
