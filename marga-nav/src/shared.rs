//! Shared state for the single-writer tracker architecture.
//!
//! The tracker thread is the only writer; UI and guidance readers poll
//! without locking on the hot path. Position is packed into one atomic
//! u64 so readers never observe an x from one step and a y from
//! another.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use marga_map::Point2D;
use parking_lot::RwLock;

/// Atomic wrapper for f32 values.
/// Uses AtomicU32 with bit reinterpretation.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Atomic wrapper for Point2D.
/// Packs both f32 bit patterns into one u64 so a load is always a
/// coherent pair.
#[derive(Debug)]
pub struct AtomicPoint(AtomicU64);

impl AtomicPoint {
    pub fn new(p: Point2D) -> Self {
        Self(AtomicU64::new(Self::pack(p)))
    }

    pub fn load(&self, order: Ordering) -> Point2D {
        Self::unpack(self.0.load(order))
    }

    pub fn store(&self, p: Point2D, order: Ordering) {
        self.0.store(Self::pack(p), order);
    }

    fn pack(p: Point2D) -> u64 {
        ((p.x.to_bits() as u64) << 32) | p.y.to_bits() as u64
    }

    fn unpack(bits: u64) -> Point2D {
        Point2D::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
    }
}

/// Tracker state shared between the sensor-consumer thread and readers.
#[derive(Debug)]
pub struct TrackerState {
    /// Steps accepted since the last reset
    pub steps: AtomicU32,

    /// Latest heading in plan space, degrees in [0, 360)
    pub heading_deg: AtomicF32,

    /// Current dead-reckoned position
    pub position: AtomicPoint,

    /// Breadcrumb trail of accepted positions, oldest first
    pub path: RwLock<Vec<Point2D>>,
}

impl TrackerState {
    pub fn new(start: Point2D) -> Self {
        Self {
            steps: AtomicU32::new(0),
            heading_deg: AtomicF32::new(0.0),
            position: AtomicPoint::new(start),
            path: RwLock::new(vec![start]),
        }
    }

    /// Reposition the tracker and clear its history. Writer-side only.
    pub fn reset(&self, start: Point2D) {
        self.steps.store(0, Ordering::SeqCst);
        self.position.store(start, Ordering::SeqCst);
        let mut path = self.path.write();
        path.clear();
        path.push(start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f32_round_trip() {
        let a = AtomicF32::new(123.456);
        assert_eq!(a.load(Ordering::SeqCst), 123.456);
        a.store(-0.25, Ordering::SeqCst);
        assert_eq!(a.load(Ordering::SeqCst), -0.25);
    }

    #[test]
    fn test_atomic_point_round_trip() {
        let p = AtomicPoint::new(Point2D::new(1.5, -2.75));
        assert_eq!(p.load(Ordering::SeqCst), Point2D::new(1.5, -2.75));
        p.store(Point2D::new(-100.0, 0.125), Ordering::SeqCst);
        assert_eq!(p.load(Ordering::SeqCst), Point2D::new(-100.0, 0.125));
    }

    #[test]
    fn test_reset_clears_history() {
        let state = TrackerState::new(Point2D::new(1.0, 1.0));
        state.steps.store(7, Ordering::SeqCst);
        state.path.write().push(Point2D::new(2.0, 1.0));

        state.reset(Point2D::new(5.0, 5.0));
        assert_eq!(state.steps.load(Ordering::SeqCst), 0);
        assert_eq!(state.position.load(Ordering::SeqCst), Point2D::new(5.0, 5.0));
        assert_eq!(*state.path.read(), vec![Point2D::new(5.0, 5.0)]);
    }
}
