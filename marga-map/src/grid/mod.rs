//! Rasterized floor-plan representation for the grid A* engine.
//!
//! The walkable-cell set is deterministic for a given plan, bounds,
//! cell size, and obstacle list, and is retained between path queries;
//! it is rebuilt only when the plan or the obstacle feed changes.

pub mod astar;

pub use astar::GridPathFinder;

use crate::config::MapConfig;
use crate::core::{geometry, Bounds, GridCoord, Point2D};
use crate::plan::FloorPlan;
use log::debug;

/// Regular lattice over the plan with a walkability bit per cell.
#[derive(Clone, Debug)]
pub struct GridMap {
    origin: Point2D,
    cell_size: f32,
    width: usize,
    height: usize,
    walkable: Vec<bool>,
}

impl GridMap {
    /// Rasterize the floor plan.
    ///
    /// A cell is walkable iff its center is:
    /// - outside every POI square buffer,
    /// - farther than half the wall's thickness from every wall segment,
    /// - inside at least one room polygon,
    /// - farther than half a cell from every reported obstacle point.
    pub fn build(
        plan: &FloorPlan,
        bounds: Bounds,
        cell_size: f32,
        obstacles: &[Point2D],
        config: &MapConfig,
    ) -> Self {
        let width = (bounds.width() / cell_size).ceil().max(1.0) as usize;
        let height = (bounds.height() / cell_size).ceil().max(1.0) as usize;
        let mut walkable = vec![false; width * height];

        for y in 0..height {
            for x in 0..width {
                let center = Point2D::new(
                    bounds.min.x + (x as f32 + 0.5) * cell_size,
                    bounds.min.y + (y as f32 + 0.5) * cell_size,
                );
                walkable[y * width + x] =
                    Self::cell_is_walkable(plan, center, cell_size, obstacles, config);
            }
        }

        let free = walkable.iter().filter(|w| **w).count();
        debug!("[GridMap] rasterized {width}x{height} cells, {free} walkable");

        Self { origin: bounds.min, cell_size, width, height, walkable }
    }

    fn cell_is_walkable(
        plan: &FloorPlan,
        center: Point2D,
        cell_size: f32,
        obstacles: &[Point2D],
        config: &MapConfig,
    ) -> bool {
        // POI footprints block their buffer square
        for poi in &plan.pois {
            if (center.x - poi.position.x).abs() <= config.poi_buffer
                && (center.y - poi.position.y).abs() <= config.poi_buffer
            {
                return false;
            }
        }

        // Thickened walls
        for wall in &plan.walls {
            if geometry::distance_point_to_segment(center, wall.start, wall.end)
                <= wall.thickness / 2.0
            {
                return false;
            }
        }

        // Must be inside some room
        if !plan.rooms.iter().any(|r| r.contains(center)) {
            return false;
        }

        // Externally detected obstacles
        let obstacle_radius = cell_size / 2.0;
        for obstacle in obstacles {
            if center.distance(obstacle) <= obstacle_radius {
                return false;
            }
        }

        true
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn in_bounds(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height
    }

    /// Walkability of a cell; out-of-bounds cells are not walkable.
    #[inline]
    pub fn is_walkable(&self, c: GridCoord) -> bool {
        self.in_bounds(c) && self.walkable[c.y as usize * self.width + c.x as usize]
    }

    /// Plan coordinate of the cell center
    #[inline]
    pub fn grid_to_world(&self, c: GridCoord) -> Point2D {
        Point2D::new(
            self.origin.x + (c.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (c.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing a plan coordinate (may be out of bounds)
    #[inline]
    pub fn world_to_grid(&self, p: Point2D) -> GridCoord {
        GridCoord::new(
            ((p.x - self.origin.x) / self.cell_size).floor() as i32,
            ((p.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// Nearest walkable cell to a plan coordinate, by cell-center
    /// distance. None when nothing is walkable.
    pub fn nearest_walkable(&self, p: Point2D) -> Option<GridCoord> {
        let snapped = self.world_to_grid(p);
        if self.is_walkable(snapped) {
            return Some(snapped);
        }
        let mut best: Option<(f32, GridCoord)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let c = GridCoord::new(x as i32, y as i32);
                if !self.is_walkable(c) {
                    continue;
                }
                let d = self.grid_to_world(c).distance_squared(&p);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, c));
                }
            }
        }
        best.map(|(_, c)| c)
    }

    /// Snapshot of all walkable coordinates, row-major. Used by the
    /// determinism tests.
    pub fn walkable_cells(&self) -> Vec<GridCoord> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.walkable[y * self.width + x] {
                    cells.push(GridCoord::new(x as i32, y as i32));
                }
            }
        }
        cells
    }
}
