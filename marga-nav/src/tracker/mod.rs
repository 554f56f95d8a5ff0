//! Pedestrian dead-reckoning tracker.
//!
//! Sensor callbacks arrive on a delivery thread and are forwarded as
//! messages over a channel; a single consumer thread owns the step
//! detector, the heading filter, and all writes to the shared
//! [`TrackerState`]. Readers poll the state without contending with
//! sensor delivery.

pub mod heading;
pub mod step;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use marga_map::core::point_in_polygon;
use marga_map::{FloorPlan, Point2D};

use crate::config::TrackerConfig;
use crate::shared::TrackerState;
use heading::HeadingFilter;
use step::StepDetector;

/// One sensor event, as delivered by the platform sensor layer.
///
/// Hardware without a step-detector or rotation sensor simply never
/// sends that variant; the tracker degrades to whatever signals exist.
#[derive(Clone, Copy, Debug)]
pub enum SensorSample {
    Accelerometer { x: f32, y: f32, z: f32, timestamp_ms: u64 },
    RotationVector { x: f32, y: f32, z: f32, w: f32 },
    StepDetected { timestamp_ms: u64 },
}

/// Dead-reckoning tracker: Idle until
/// [`start_listening`](Self::start_listening), then consumes sensor
/// samples until [`stop_listening`](Self::stop_listening).
pub struct DeadReckoningTracker {
    config: TrackerConfig,
    state: Arc<TrackerState>,
    outer_polygon: Vec<Point2D>,
    sender: Option<Sender<SensorSample>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DeadReckoningTracker {
    pub fn new(plan: &FloorPlan, start: Point2D, config: TrackerConfig) -> Self {
        Self {
            config,
            state: Arc::new(TrackerState::new(start)),
            outer_polygon: plan.outer_polygon(),
            sender: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Shared state readers poll: step count, heading, position, path.
    pub fn state(&self) -> Arc<TrackerState> {
        Arc::clone(&self.state)
    }

    pub fn is_listening(&self) -> bool {
        self.sender.is_some()
    }

    /// Begin a listening session and return the sample sender the
    /// sensor layer feeds. Idempotent: a second call returns the
    /// sender of the already-running session.
    pub fn start_listening(&mut self) -> Sender<SensorSample> {
        if let Some(sender) = &self.sender {
            tracing::debug!("tracker already listening");
            return sender.clone();
        }

        let (tx, rx) = bounded::<SensorSample>(256);
        self.shutdown.store(false, Ordering::SeqCst);

        let state = Arc::clone(&self.state);
        let shutdown = Arc::clone(&self.shutdown);
        let outer = self.outer_polygon.clone();
        let config = self.config.clone();

        let handle = std::thread::spawn(move || {
            tracing::info!("tracker consumer thread started");
            let mut detector = StepDetector::new(&config);
            let filter = HeadingFilter::new(&config);

            loop {
                // Checked every iteration, not only on timeout, so a
                // producer that keeps the channel busy cannot delay
                // shutdown indefinitely
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                match rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(sample) => {
                        let stepped = match sample {
                            SensorSample::Accelerometer { x, y, z, timestamp_ms } => {
                                detector.on_accelerometer(x, y, z, timestamp_ms)
                            }
                            SensorSample::StepDetected { timestamp_ms } => {
                                detector.on_hardware_step(timestamp_ms)
                            }
                            SensorSample::RotationVector { x, y, z, w } => {
                                let deg = filter.heading_deg(x, y, z, w);
                                state.heading_deg.store(deg, Ordering::SeqCst);
                                false
                            }
                        };
                        if stepped {
                            advance(&state, &outer, &config);
                        }
                    }
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::info!("tracker consumer thread stopped");
        });

        self.sender = Some(tx.clone());
        self.handle = Some(handle);
        tx
    }

    /// End the listening session. Returns promptly even while senders
    /// are still delivering; samples queued at that point are dropped.
    /// Idempotent.
    pub fn stop_listening(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("tracker consumer thread panicked");
            }
        }
    }
}

impl Drop for DeadReckoningTracker {
    fn drop(&mut self) {
        self.stop_listening();
    }
}

/// Apply one detected step to the shared state.
///
/// The candidate displacement follows the current heading. When the
/// candidate leaves the outer wall polygon the stride is shortened in
/// fixed decrements; below the floor the movement is discarded but the
/// step still counts.
fn advance(state: &TrackerState, outer: &[Point2D], config: &TrackerConfig) {
    state.steps.fetch_add(1, Ordering::SeqCst);

    let position = state.position.load(Ordering::SeqCst);
    let theta = state.heading_deg.load(Ordering::SeqCst).to_radians();
    let direction = Point2D::new(theta.cos(), theta.sin());

    let mut length = config.step_length;
    while length >= config.min_step_length - 1e-6 {
        let candidate = position + direction * length;
        if outer.len() < 3 || point_in_polygon(candidate.x, candidate.y, outer) {
            state.position.store(candidate, Ordering::SeqCst);
            state.path.write().push(candidate);
            tracing::trace!(x = candidate.x, y = candidate.y, length, "step accepted");
            return;
        }
        length -= config.step_decrement;
    }
    tracing::trace!(x = position.x, y = position.y, "step discarded at boundary");
}
