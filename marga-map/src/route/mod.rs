//! Route orchestration: endpoint resolution, shortest-path search, and
//! smoothing.
//!
//! The entry point is [`PathFinder::find_path`]. Endpoints are a closed
//! enum; a raw coordinate synthesizes a query-scoped temporary node that
//! is guaranteed to be removed again, whichever end it was on.

pub mod smoothing;

use crate::config::MapConfig;
use crate::core::Point2D;
use crate::graph::{dijkstra, GraphBuilder, NavGraph, Node, NodeId, NodeKind};
use crate::plan::FloorPlan;
use log::{debug, trace};
use thiserror::Error;

/// Routing errors. An unreachable destination is not an error; it is an
/// empty path, so callers can distinguish "no route" from "no such
/// destination".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Named POI, door, or window has no node in the graph, or a free
    /// coordinate has nothing connectable nearby.
    #[error("unresolved {role}: {what}")]
    UnresolvedEndpoint { role: &'static str, what: String },
}

/// A start or destination for a routing request.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    /// Free plan-space coordinate
    Coordinate(Point2D),
    /// POI by name
    Poi(String),
    /// Door by its coordinates
    Door(Point2D),
    /// Window by its coordinates
    Window(Point2D),
}

impl Endpoint {
    /// Resolve to a plan position without graph participation. Used by
    /// engines that only need a coordinate (the grid engine).
    pub fn resolve_position(&self, plan: &FloorPlan) -> Result<Point2D, RouteError> {
        match self {
            Endpoint::Coordinate(p) => Ok(*p),
            Endpoint::Poi(name) => plan
                .poi(name)
                .map(|p| p.position)
                .ok_or_else(|| RouteError::UnresolvedEndpoint {
                    role: "endpoint",
                    what: name.clone(),
                }),
            Endpoint::Door(p) | Endpoint::Window(p) => Ok(*p),
        }
    }
}

/// Scoped record of query-specific nodes. Discarding it removes every
/// temporary node (and its incident edges) from the graph, regardless
/// of which end of the query created it.
#[derive(Default)]
struct TempArena {
    node_ids: Vec<NodeId>,
}

impl TempArena {
    fn track(&mut self, id: NodeId) {
        self.node_ids.push(id);
    }

    fn discard(self, graph: &mut NavGraph) {
        for id in self.node_ids {
            graph.remove_node(&id);
        }
    }

    /// Remove a single tracked node early (failed resolution).
    fn discard_one(&mut self, graph: &mut NavGraph, id: &str) {
        graph.remove_node(id);
        self.node_ids.retain(|n| n != id);
    }
}

/// Resolves endpoints, runs Dijkstra, and smooths the result.
pub struct PathFinder {
    plan: FloorPlan,
    config: MapConfig,
}

impl PathFinder {
    pub fn new(plan: FloorPlan, config: MapConfig) -> Self {
        Self { plan, config }
    }

    pub fn with_defaults(plan: FloorPlan) -> Self {
        Self::new(plan, MapConfig::default())
    }

    pub fn floor_plan(&self) -> &FloorPlan {
        &self.plan
    }

    /// Compute a smoothed route between two endpoints.
    ///
    /// Returns `Ok(vec![])` when both endpoints resolve but no route
    /// connects them.
    pub fn find_path(
        &self,
        start: &Endpoint,
        destination: &Endpoint,
    ) -> Result<Vec<Point2D>, RouteError> {
        // The check never fires, so None cannot occur; fold it into the
        // empty path rather than keeping a panic site
        let path = self.find_path_cancellable(start, destination, &|| false)?;
        Ok(path.unwrap_or_default())
    }

    /// Like [`find_path`](Self::find_path) but checks `is_cancelled`
    /// between phases (build, resolve, search, smooth) and returns
    /// `Ok(None)` as soon as a check fires. Cancellation is
    /// cooperative, not preemptive.
    pub fn find_path_cancellable(
        &self,
        start: &Endpoint,
        destination: &Endpoint,
        is_cancelled: &(dyn Fn() -> bool + Sync),
    ) -> Result<Option<Vec<Point2D>>, RouteError> {
        let builder = GraphBuilder::new(self.config.clone());
        let mut graph = builder.build(&self.plan);
        if is_cancelled() {
            return Ok(None);
        }

        // Every graph mutation from here on is scoped to the arena so
        // the graph ends the query without query-specific state.
        let mut arena = TempArena::default();
        let start_id = match self.resolve(start, "start", &mut graph, &mut arena) {
            Ok(id) => id,
            Err(e) => {
                arena.discard(&mut graph);
                return Err(e);
            }
        };
        let end_id = match self.resolve(destination, "destination", &mut graph, &mut arena) {
            Ok(id) => id,
            Err(e) => {
                arena.discard(&mut graph);
                return Err(e);
            }
        };
        if is_cancelled() {
            arena.discard(&mut graph);
            return Ok(None);
        }

        let ids = dijkstra::shortest_path(&graph, &start_id, &end_id);
        let raw: Vec<Point2D> = ids
            .iter()
            .filter_map(|id| graph.node(id))
            .map(|n| n.position)
            .collect();
        arena.discard(&mut graph);
        if is_cancelled() {
            return Ok(None);
        }

        if raw.is_empty() {
            debug!("[PathFinder] no route between {start_id} and {end_id}");
            return Ok(Some(Vec::new()));
        }
        Ok(Some(smoothing::smooth(&raw, &self.config)))
    }

    /// Resolve an endpoint into a graph node id, synthesizing a
    /// temporary node for free coordinates.
    fn resolve(
        &self,
        endpoint: &Endpoint,
        role: &'static str,
        graph: &mut NavGraph,
        arena: &mut TempArena,
    ) -> Result<NodeId, RouteError> {
        let lookup = |graph: &NavGraph, id: String, what: String| {
            if graph.contains(&id) {
                Ok(id)
            } else {
                Err(RouteError::UnresolvedEndpoint { role, what })
            }
        };

        match endpoint {
            Endpoint::Poi(name) => {
                lookup(graph, format!("poi:{name}"), name.clone())
            }
            Endpoint::Door(p) => {
                lookup(graph, Node::door(*p).id, format!("door at ({}, {})", p.x, p.y))
            }
            Endpoint::Window(p) => {
                lookup(graph, Node::window(*p).id, format!("window at ({}, {})", p.x, p.y))
            }
            Endpoint::Coordinate(p) => self.attach_coordinate(*p, role, graph, arena),
        }
    }

    /// Synthesize and link a temporary node for a free coordinate.
    fn attach_coordinate(
        &self,
        p: Point2D,
        role: &'static str,
        graph: &mut NavGraph,
        arena: &mut TempArena,
    ) -> Result<NodeId, RouteError> {
        let node = Node::temp(role, p);
        let id = node.id.clone();
        graph.add_node(node);
        arena.track(id.clone());

        if let Some(room) = self.plan.room_containing(p) {
            // In-room: connect to every navigable node of this room
            let room_node_id = Node::room(&room.name, room.center).id;
            let mut targets: Vec<NodeId> = graph
                .nodes()
                .filter(|n| {
                    matches!(n.kind, NodeKind::Poi | NodeKind::Window | NodeKind::Door)
                        && room.contains(n.position)
                })
                .map(|n| n.id.clone())
                .collect();
            if graph.contains(&room_node_id) {
                targets.push(room_node_id);
            }
            for target in &targets {
                graph.connect_by_distance(&id, target);
            }
            trace!("[PathFinder] temp {role} linked to {} nodes in {}", targets.len(), room.name);
            return Ok(id);
        }

        // Out-of-room: link to the nearest connectable nodes within the
        // configured radius
        let mut candidates: Vec<(f32, NodeId)> = graph
            .nodes()
            .filter(|n| matches!(n.kind, NodeKind::Door | NodeKind::Poi | NodeKind::Room))
            .map(|n| (n.position.distance(&p), n.id.clone()))
            .filter(|(d, _)| *d <= self.config.connect_radius)
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(self.config.temp_link_count);

        if candidates.is_empty() {
            arena.discard_one(graph, &id);
            return Err(RouteError::UnresolvedEndpoint {
                role,
                what: format!("coordinate ({}, {})", p.x, p.y),
            });
        }
        for (_, target) in &candidates {
            graph.connect_by_distance(&id, target);
        }
        trace!("[PathFinder] temp {role} linked to {} nearby nodes", candidates.len());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Door, Poi, Room};

    fn square(x0: f32, y0: f32, size: f32) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0, y0 + size),
        ]
    }

    fn two_room_plan() -> FloorPlan {
        FloorPlan {
            rooms: vec![
                Room {
                    polygon: square(0.0, 0.0, 5.0),
                    name: "Kitchen".to_string(),
                    center: Point2D::new(2.5, 2.5),
                },
                Room {
                    polygon: square(5.0, 0.0, 5.0),
                    name: "Hall".to_string(),
                    center: Point2D::new(7.5, 2.5),
                },
            ],
            doors: vec![Door { position: Point2D::new(5.0, 2.5) }],
            pois: vec![
                Poi { name: "stove".to_string(), position: Point2D::new(1.0, 1.0) },
                Poi { name: "sofa".to_string(), position: Point2D::new(8.0, 1.0) },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_poi_to_poi_route_crosses_door() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let path = finder
            .find_path(
                &Endpoint::Poi("stove".to_string()),
                &Endpoint::Poi("sofa".to_string()),
            )
            .unwrap();
        assert!(!path.is_empty());
        assert_eq!(path[0], Point2D::new(1.0, 1.0));
        assert_eq!(*path.last().unwrap(), Point2D::new(8.0, 1.0));
        // Must pass near the door on the shared wall at x = 5
        assert!(path.iter().any(|p| (p.x - 5.0).abs() < 1.0));
    }

    #[test]
    fn test_unknown_poi_is_an_error() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let err = finder
            .find_path(
                &Endpoint::Poi("stove".to_string()),
                &Endpoint::Poi("fridge".to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::UnresolvedEndpoint { role: "destination", .. }));
    }

    #[test]
    fn test_coordinate_inside_room_resolves() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let path = finder
            .find_path(
                &Endpoint::Coordinate(Point2D::new(2.0, 3.0)),
                &Endpoint::Poi("sofa".to_string()),
            )
            .unwrap();
        assert!(!path.is_empty());
        assert_eq!(path[0], Point2D::new(2.0, 3.0));
    }

    #[test]
    fn test_coordinate_far_outside_is_unresolved() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let err = finder
            .find_path(
                &Endpoint::Coordinate(Point2D::new(100.0, 100.0)),
                &Endpoint::Poi("sofa".to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::UnresolvedEndpoint { role: "start", .. }));
    }

    #[test]
    fn test_coordinate_near_building_links_to_nearest_nodes() {
        let finder = PathFinder::with_defaults(two_room_plan());
        // Just outside both rooms but within the connect radius of the
        // Kitchen center and stove
        let path = finder
            .find_path(
                &Endpoint::Coordinate(Point2D::new(-0.5, 2.5)),
                &Endpoint::Poi("stove".to_string()),
            )
            .unwrap();
        assert!(!path.is_empty());
    }

    #[test]
    fn test_unreachable_destination_is_empty_not_error() {
        let mut plan = two_room_plan();
        // Island room far away with its own POI, no doors
        plan.rooms.push(Room {
            polygon: square(50.0, 50.0, 5.0),
            name: "Vault".to_string(),
            center: Point2D::new(52.5, 52.5),
        });
        plan.pois.push(Poi { name: "safe".to_string(), position: Point2D::new(51.0, 51.0) });

        let finder = PathFinder::with_defaults(plan);
        let path = finder
            .find_path(
                &Endpoint::Poi("stove".to_string()),
                &Endpoint::Poi("safe".to_string()),
            )
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_temp_arena_discards_both_ends() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let mut graph = GraphBuilder::new(MapConfig::default()).build(finder.floor_plan());
        let baseline_nodes = graph.node_count();
        let baseline_edges = graph.edges().len();

        let mut arena = TempArena::default();
        let s = finder
            .resolve(&Endpoint::Coordinate(Point2D::new(1.0, 2.0)), "start", &mut graph, &mut arena)
            .unwrap();
        let e = finder
            .resolve(
                &Endpoint::Coordinate(Point2D::new(8.0, 2.0)),
                "destination",
                &mut graph,
                &mut arena,
            )
            .unwrap();
        assert!(graph.contains(&s));
        assert!(graph.contains(&e));
        assert!(graph.edges().len() > baseline_edges);

        arena.discard(&mut graph);
        assert_eq!(graph.node_count(), baseline_nodes);
        assert_eq!(graph.edges().len(), baseline_edges);
    }

    #[test]
    fn test_door_endpoint_resolves_by_coordinates() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let path = finder
            .find_path(
                &Endpoint::Door(Point2D::new(5.0, 2.5)),
                &Endpoint::Poi("stove".to_string()),
            )
            .unwrap();
        assert!(!path.is_empty());
        assert!(finder
            .find_path(
                &Endpoint::Door(Point2D::new(9.0, 9.0)),
                &Endpoint::Poi("stove".to_string()),
            )
            .is_err());
    }

    #[test]
    fn test_cancellation_returns_none() {
        let finder = PathFinder::with_defaults(two_room_plan());
        let result = finder
            .find_path_cancellable(
                &Endpoint::Poi("stove".to_string()),
                &Endpoint::Poi("sofa".to_string()),
                &|| true,
            )
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_resolve_position_for_grid_engine() {
        let plan = two_room_plan();
        assert_eq!(
            Endpoint::Poi("stove".to_string()).resolve_position(&plan).unwrap(),
            Point2D::new(1.0, 1.0)
        );
        assert_eq!(
            Endpoint::Coordinate(Point2D::new(9.0, 9.0)).resolve_position(&plan).unwrap(),
            Point2D::new(9.0, 9.0)
        );
        assert!(Endpoint::Poi("nope".to_string()).resolve_position(&plan).is_err());
    }
}
