//! Background path computation with single-flight semantics.
//!
//! At most one path request is in flight; issuing a new request
//! cancels the previous one. Cancellation is cooperative, checked
//! between computation phases by the engine, and a superseded request
//! never reaches its callbacks. Exactly one of `on_success` and
//! `on_error` runs per surviving request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use marga_map::{Endpoint, FloorPlan, PathFinder, PathStrategy, Point2D};
use parking_lot::RwLock;

use crate::error::NavError;

pub struct SafePathFinder {
    strategy: RwLock<Option<Arc<dyn PathStrategy>>>,
    generation: Arc<AtomicU64>,
}

impl SafePathFinder {
    pub fn new() -> Self {
        Self { strategy: RwLock::new(None), generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Install the graph engine over a floor-plan snapshot. Replaces
    /// any previously installed strategy.
    pub fn set_floor_plan(&self, plan: FloorPlan) {
        self.set_strategy(Arc::new(PathFinder::with_defaults(plan)));
    }

    /// Install an arbitrary engine. In-flight requests against the old
    /// strategy keep their own Arc and finish (or cancel) undisturbed.
    pub fn set_strategy(&self, strategy: Arc<dyn PathStrategy>) {
        *self.strategy.write() = Some(strategy);
    }

    /// Compute a route in the background.
    ///
    /// Any still-running previous request is cancelled first. The
    /// surviving request invokes exactly one callback; a cancelled one
    /// invokes none. Callbacks run on the worker thread.
    pub fn request_path(
        &self,
        start: Endpoint,
        goal: Endpoint,
        on_success: impl FnOnce(Vec<Point2D>) + Send + 'static,
        on_error: impl FnOnce(NavError) + Send + 'static,
    ) -> JoinHandle<()> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let strategy = self.strategy.read().clone();

        std::thread::spawn(move || {
            let Some(strategy) = strategy else {
                tracing::warn!("path requested before a floor plan was set");
                on_error(NavError::Config("no floor plan installed".to_string()));
                return;
            };

            let is_cancelled = || generation.load(Ordering::SeqCst) != my_generation;
            let result = strategy.plan_route_cancellable(&start, &goal, &is_cancelled);

            // A request superseded mid-flight or right at the end gets
            // no callback at all
            if generation.load(Ordering::SeqCst) != my_generation {
                tracing::debug!("dropping superseded path result");
                return;
            }

            match result {
                Ok(Some(path)) => on_success(path),
                Ok(None) => tracing::debug!("path request cancelled"),
                Err(e) => on_error(e.into()),
            }
        })
    }

    /// Cancel any in-flight request. Its callbacks will not run.
    pub fn cleanup(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for SafePathFinder {
    fn default() -> Self {
        Self::new()
    }
}
