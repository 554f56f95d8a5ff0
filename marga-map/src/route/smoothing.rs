//! Post-processing of raw node paths into piecewise-orthogonal,
//! corner-rounded polylines.
//!
//! Smoothing is purely geometric: a rounded corner is not re-checked
//! against walls. The graph edges already kept the raw path in
//! navigable space.

use crate::config::MapConfig;
use crate::core::Point2D;

const DEDUP_EPSILON: f32 = 1e-4;

/// Full smoothing pipeline: orthogonalize, simplify, round corners,
/// de-duplicate.
pub fn smooth(path: &[Point2D], config: &MapConfig) -> Vec<Point2D> {
    if path.len() < 2 {
        return path.to_vec();
    }
    let ortho = orthogonalize(path);
    let simple = simplify(&ortho);
    let rounded = round_corners(&simple, config.rounding_radius, config.arc_points);
    dedup(rounded)
}

/// Force strict orthogonal turns: whenever consecutive points differ on
/// both axes, insert an intermediate bend, travelling the axis of
/// larger displacement first.
pub fn orthogonalize(path: &[Point2D]) -> Vec<Point2D> {
    if path.len() < 2 {
        return path.to_vec();
    }
    let mut out = Vec::with_capacity(path.len() * 2);
    out.push(path[0]);
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx != 0.0 && dy != 0.0 {
            let bend = if dx.abs() >= dy.abs() {
                Point2D::new(b.x, a.y)
            } else {
                Point2D::new(a.x, b.y)
            };
            out.push(bend);
        }
        out.push(b);
    }
    out
}

/// Collapse consecutive same-direction segments into one.
pub fn simplify(path: &[Point2D]) -> Vec<Point2D> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    for i in 1..path.len() - 1 {
        let incoming = direction(path[i - 1], path[i]);
        let outgoing = direction(path[i], path[i + 1]);
        if incoming != outgoing {
            out.push(path[i]);
        }
    }
    out.push(path[path.len() - 1]);
    out
}

fn direction(a: Point2D, b: Point2D) -> (i8, i8) {
    let sign = |v: f32| {
        if v > 0.0 {
            1
        } else if v < 0.0 {
            -1
        } else {
            0
        }
    };
    (sign(b.x - a.x), sign(b.y - a.y))
}

/// Replace every corner with a short interpolated arc between the
/// flanking segments.
///
/// Each corner is trimmed back by the fillet radius (clamped to half of
/// either flanking segment) and bridged with `arc_points` samples of
/// the quadratic Bezier whose control point is the original corner.
pub fn round_corners(path: &[Point2D], radius: f32, arc_points: usize) -> Vec<Point2D> {
    if path.len() < 3 || radius <= 0.0 || arc_points < 2 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    for i in 1..path.len() - 1 {
        let prev = path[i - 1];
        let corner = path[i];
        let next = path[i + 1];

        let len_in = prev.distance(&corner);
        let len_out = corner.distance(&next);
        if len_in < DEDUP_EPSILON || len_out < DEDUP_EPSILON {
            out.push(corner);
            continue;
        }

        let r_in = radius.min(len_in / 2.0);
        let r_out = radius.min(len_out / 2.0);
        let entry = corner + (prev - corner).normalize() * r_in;
        let exit = corner + (next - corner).normalize() * r_out;

        for k in 0..arc_points {
            let t = k as f32 / (arc_points - 1) as f32;
            let u = 1.0 - t;
            let p = entry * (u * u) + corner * (2.0 * u * t) + exit * (t * t);
            out.push(p);
        }
    }
    out.push(path[path.len() - 1]);
    out
}

/// Drop consecutive near-duplicate points.
pub fn dedup(path: Vec<Point2D>) -> Vec<Point2D> {
    let mut out: Vec<Point2D> = Vec::with_capacity(path.len());
    for p in path {
        if out.last().map_or(true, |last| last.distance(&p) > DEDUP_EPSILON) {
            out.push(p);
        }
    }
    out
}

/// Total polyline length in plan units.
pub fn path_length(path: &[Point2D]) -> f32 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
