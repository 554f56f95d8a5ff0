//! A* search over the rasterized grid.
//!
//! 8-connected expansion, g = accumulated Euclidean distance, h =
//! straight-line distance to the goal (admissible and consistent on a
//! Euclidean grid).

use super::GridMap;
use crate::config::MapConfig;
use crate::core::{Bounds, GridCoord, Point2D};
use crate::plan::FloorPlan;
use crate::route::RouteError;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A node in the A* search
#[derive(Clone, Debug)]
struct AStarNode {
    coord: GridCoord,
    f_cost: f32,
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other.f_cost.partial_cmp(&self.f_cost).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grid-based pathfinding engine, independent of the navigation graph.
///
/// Owns its rasterized cell set; the raster survives across queries and
/// is rebuilt when the obstacle feed changes.
pub struct GridPathFinder {
    plan: FloorPlan,
    bounds: Bounds,
    config: MapConfig,
    obstacles: Vec<Point2D>,
    grid: GridMap,
}

impl GridPathFinder {
    pub fn new(plan: FloorPlan, bounds: Bounds, config: MapConfig) -> Self {
        let grid = GridMap::build(&plan, bounds, config.cell_size, &[], &config);
        Self { plan, bounds, config, obstacles: Vec::new(), grid }
    }

    pub fn with_defaults(plan: FloorPlan, bounds: Bounds) -> Self {
        Self::new(plan, bounds, MapConfig::default())
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn floor_plan(&self) -> &FloorPlan {
        &self.plan
    }

    /// Replace the externally detected obstacle set and re-rasterize.
    pub fn set_obstacles(&mut self, obstacles: Vec<Point2D>) {
        self.obstacles = obstacles;
        self.grid =
            GridMap::build(&self.plan, self.bounds, self.config.cell_size, &self.obstacles, &self.config);
    }

    /// Find a path between two plan coordinates.
    ///
    /// Start and goal are snapped to their nearest walkable cells.
    /// Returns an empty path when the grid has no route; errors only
    /// when an endpoint cannot be snapped at all (no walkable cell).
    pub fn find_path(&self, start: Point2D, goal: Point2D) -> Result<Vec<Point2D>, RouteError> {
        let start_cell = self.grid.nearest_walkable(start).ok_or_else(|| {
            RouteError::UnresolvedEndpoint {
                role: "start",
                what: format!("coordinate ({}, {})", start.x, start.y),
            }
        })?;
        let goal_cell = self.grid.nearest_walkable(goal).ok_or_else(|| {
            RouteError::UnresolvedEndpoint {
                role: "destination",
                what: format!("coordinate ({}, {})", goal.x, goal.y),
            }
        })?;
        trace!(
            "[GridAStar] start=({},{}) goal=({},{})",
            start_cell.x, start_cell.y, goal_cell.x, goal_cell.y
        );

        let cells = match self.search(start_cell, goal_cell) {
            Some(cells) => cells,
            None => {
                debug!("[GridAStar] no path");
                return Ok(Vec::new());
            }
        };

        let world: Vec<Point2D> = cells.iter().map(|c| self.grid.grid_to_world(*c)).collect();
        Ok(simplify_path(&world))
    }

    fn search(&self, start: GridCoord, goal: GridCoord) -> Option<Vec<GridCoord>> {
        let cell = self.grid.cell_size();
        let diagonal = cell * std::f32::consts::SQRT_2;

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
        let mut g_scores: HashMap<GridCoord, f32> = HashMap::new();

        open_set.push(AStarNode { coord: start, f_cost: self.heuristic(start, goal) });
        g_scores.insert(start, 0.0);

        while let Some(current) = open_set.pop() {
            if current.coord == goal {
                return Some(reconstruct(came_from, goal));
            }
            if !closed_set.insert(current.coord) {
                continue;
            }

            for (i, neighbor) in current.coord.neighbors_8().iter().enumerate() {
                if closed_set.contains(neighbor) || !self.grid.is_walkable(*neighbor) {
                    continue;
                }

                // First 4 neighbors are cardinal, last 4 diagonal
                let move_cost = if i < 4 { cell } else { diagonal };
                let tentative = g_scores[&current.coord] + move_cost;
                let best = g_scores.get(neighbor).copied().unwrap_or(f32::INFINITY);
                if tentative < best {
                    came_from.insert(*neighbor, current.coord);
                    g_scores.insert(*neighbor, tentative);
                    open_set.push(AStarNode {
                        coord: *neighbor,
                        f_cost: tentative + self.heuristic(*neighbor, goal),
                    });
                }
            }
        }
        None
    }

    /// Straight-line distance between cell centers
    fn heuristic(&self, from: GridCoord, to: GridCoord) -> f32 {
        self.grid.grid_to_world(from).distance(&self.grid.grid_to_world(to))
    }
}

fn reconstruct(came_from: HashMap<GridCoord, GridCoord>, goal: GridCoord) -> Vec<GridCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Remove interior points exactly collinear with their neighbors
/// (cross-product test).
pub fn simplify_path(path: &[Point2D]) -> Vec<Point2D> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    for i in 1..path.len() - 1 {
        let a = path[i - 1];
        let b = path[i];
        let c = path[i + 1];
        let cross = (b - a).cross(&(c - b));
        if cross.abs() > f32::EPSILON {
            out.push(b);
        }
    }
    out.push(path[path.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Room, Wall};

    fn square(x0: f32, y0: f32, size: f32) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0, y0 + size),
        ]
    }

    fn open_plan() -> FloorPlan {
        FloorPlan {
            rooms: vec![Room {
                polygon: square(0.0, 0.0, 10.0),
                name: "Hall".to_string(),
                center: Point2D::new(5.0, 5.0),
            }],
            ..Default::default()
        }
    }

    fn bounds_10() -> Bounds {
        Bounds::new(Point2D::ZERO, Point2D::new(10.0, 10.0))
    }

    #[test]
    fn test_straight_path() {
        let finder = GridPathFinder::with_defaults(open_plan(), bounds_10());
        let path = finder
            .find_path(Point2D::new(1.0, 5.0), Point2D::new(9.0, 5.0))
            .unwrap();
        assert!(path.len() >= 2);
        assert!(path[0].distance(&Point2D::new(1.0, 5.0)) < 0.5);
        assert!(path.last().unwrap().distance(&Point2D::new(9.0, 5.0)) < 0.5);
        // Straight corridor collapses to few waypoints after simplification
        assert!(path.len() <= 3);
    }

    #[test]
    fn test_path_goes_around_wall() {
        let mut plan = open_plan();
        plan.walls.push(Wall {
            start: Point2D::new(5.0, 0.0),
            end: Point2D::new(5.0, 7.0),
            thickness: 0.4,
        });
        let finder = GridPathFinder::with_defaults(plan, bounds_10());
        let path = finder
            .find_path(Point2D::new(2.0, 2.0), Point2D::new(8.0, 2.0))
            .unwrap();
        assert!(!path.is_empty());
        // Must detour above the wall end at y = 7
        assert!(path.iter().any(|p| p.y > 6.5));
    }

    #[test]
    fn test_no_route_is_empty_not_error() {
        let mut plan = open_plan();
        // Wall splits the room completely
        plan.walls.push(Wall {
            start: Point2D::new(5.0, -1.0),
            end: Point2D::new(5.0, 11.0),
            thickness: 0.4,
        });
        let finder = GridPathFinder::with_defaults(plan, bounds_10());
        let path = finder
            .find_path(Point2D::new(2.0, 5.0), Point2D::new(8.0, 5.0))
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_unsnappable_endpoint_is_error() {
        let finder = GridPathFinder::with_defaults(FloorPlan::default(), bounds_10());
        assert!(finder
            .find_path(Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0))
            .is_err());
    }

    #[test]
    fn test_obstacle_feed_invalidates_raster() {
        let mut finder = GridPathFinder::with_defaults(open_plan(), bounds_10());
        let before = finder.grid().walkable_cells().len();
        finder.set_obstacles(vec![Point2D::new(5.125, 5.125)]);
        let after = finder.grid().walkable_cells().len();
        assert!(after < before);

        // Clearing restores the original raster
        finder.set_obstacles(Vec::new());
        assert_eq!(finder.grid().walkable_cells().len(), before);
    }

    #[test]
    fn test_simplify_path_removes_collinear() {
        let path = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(3.0, 2.0),
            Point2D::new(4.0, 2.0),
        ];
        let simple = simplify_path(&path);
        assert_eq!(
            simple,
            vec![Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0), Point2D::new(4.0, 2.0)]
        );
    }
}
