//! # Marga-Map: Indoor Navigation Library
//!
//! Converts a semantic floor plan (walls, rooms, doors, windows, POIs,
//! danger zones) into routes a visually-impaired user can follow.
//!
//! ## Architecture
//!
//! The library is organized into modules:
//!
//! - [`core`]: Fundamental types (Point2D, GridCoord, Bounds) and the
//!   geometry kernel (point-in-polygon, segment intersection)
//! - [`plan`]: The immutable floor-plan model
//! - [`graph`]: Navigable-feature graph, its builder, and Dijkstra
//! - [`route`]: Endpoint resolution, orchestration, and path smoothing
//! - [`grid`]: Rasterized alternative engine with A*
//! - [`config`]: Tuning parameters
//!
//! ## Data Flow
//!
//! ```text
//!   ┌──────────────┐      ┌───────────────┐      ┌──────────────┐
//!   │  FloorPlan   │ ───► │ GraphBuilder  │ ───► │   Dijkstra   │
//!   │  (snapshot)  │      │ (per request) │      │              │
//!   └──────┬───────┘      └───────────────┘      └──────┬───────┘
//!          │                                            │
//!          │              ┌───────────────┐      ┌──────▼───────┐
//!          └────────────► │   GridMap     │      │  Smoothing   │
//!                         │  (cached) +A* │      │ (ortho+arcs) │
//!                         └───────────────┘      └──────────────┘
//! ```
//!
//! Both engines implement [`PathStrategy`]; pick one per deployment,
//! their results are never mixed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marga_map::{Endpoint, PathFinder, plan::FloorPlan};
//! use marga_map::core::Point2D;
//!
//! let plan = FloorPlan::default(); // supplied by the external loader
//! let finder = PathFinder::with_defaults(plan);
//! let route = finder.find_path(
//!     &Endpoint::Coordinate(Point2D::new(1.0, 1.0)),
//!     &Endpoint::Poi("exit".to_string()),
//! )?;
//! # Ok::<(), marga_map::RouteError>(())
//! ```

pub mod config;
pub mod core;
pub mod graph;
pub mod grid;
pub mod plan;
pub mod route;

// Re-export main types at crate root
pub use self::core::{Bounds, GridCoord, Point2D};
pub use config::MapConfig;
pub use graph::{GraphBuilder, NavGraph, Node, NodeKind};
pub use grid::GridPathFinder;
pub use plan::FloorPlan;
pub use route::{Endpoint, PathFinder, RouteError};

/// A pathfinding engine producing an ordered polyline between two
/// endpoints.
///
/// The graph engine ([`PathFinder`]) and the grid engine
/// ([`GridPathFinder`]) both implement this; they are interchangeable
/// strategies, never silently combined.
pub trait PathStrategy: Send + Sync {
    /// Compute a route. `Ok(vec![])` means both endpoints resolved but
    /// no route connects them.
    fn plan_route(&self, start: &Endpoint, goal: &Endpoint) -> Result<Vec<Point2D>, RouteError>;

    /// Like [`plan_route`](Self::plan_route) with a cooperative
    /// cancellation check between computation phases. `Ok(None)` means
    /// the request was cancelled.
    fn plan_route_cancellable(
        &self,
        start: &Endpoint,
        goal: &Endpoint,
        is_cancelled: &(dyn Fn() -> bool + Sync),
    ) -> Result<Option<Vec<Point2D>>, RouteError> {
        if is_cancelled() {
            return Ok(None);
        }
        self.plan_route(start, goal).map(Some)
    }
}

impl PathStrategy for PathFinder {
    fn plan_route(&self, start: &Endpoint, goal: &Endpoint) -> Result<Vec<Point2D>, RouteError> {
        self.find_path(start, goal)
    }

    fn plan_route_cancellable(
        &self,
        start: &Endpoint,
        goal: &Endpoint,
        is_cancelled: &(dyn Fn() -> bool + Sync),
    ) -> Result<Option<Vec<Point2D>>, RouteError> {
        self.find_path_cancellable(start, goal, is_cancelled)
    }
}

impl PathStrategy for GridPathFinder {
    fn plan_route(&self, start: &Endpoint, goal: &Endpoint) -> Result<Vec<Point2D>, RouteError> {
        let start = start.resolve_position(self.floor_plan())?;
        let goal = goal.resolve_position(self.floor_plan())?;
        self.find_path(start, goal)
    }
}
