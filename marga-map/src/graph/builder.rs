//! Navigation-graph construction from a floor plan.
//!
//! Three ordered phases, each assuming the previous one's nodes exist:
//!
//! 1. `add_navigable_elements` - one node per door, window, POI, room
//!    center, and zone center
//! 2. `connect_nodes` - doors to containing rooms, intra-room features
//!    to each other and the room center, POIs/windows to room doors
//! 3. `apply_risk_penalties` - multiply the weight of edges crossing a
//!    danger zone

use super::{Edge, NavGraph, Node, NodeKind};
use crate::config::MapConfig;
use crate::core::geometry;
use crate::plan::{FloorPlan, Room};
use log::{debug, trace};

/// Builds a fresh [`NavGraph`] per path computation.
pub struct GraphBuilder {
    config: MapConfig,
}

impl GraphBuilder {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MapConfig::default())
    }

    /// Run all three phases in order.
    pub fn build(&self, plan: &FloorPlan) -> NavGraph {
        let mut graph = NavGraph::new();
        self.add_navigable_elements(plan, &mut graph);
        self.connect_nodes(plan, &mut graph);
        self.apply_risk_penalties(plan, &mut graph);
        debug!(
            "[GraphBuilder] built graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edges().len()
        );
        graph
    }

    /// Phase 1: emit one node per navigable feature.
    pub fn add_navigable_elements(&self, plan: &FloorPlan, graph: &mut NavGraph) {
        for door in &plan.doors {
            graph.add_node(Node::door(door.position));
        }
        for window in &plan.windows {
            graph.add_node(Node::window(window.position));
        }
        for poi in &plan.pois {
            graph.add_node(Node::poi(&poi.name, poi.position));
        }
        for room in &plan.rooms {
            // The loader emits a synthetic "Room 1" wrapper around
            // single-room plans; skip it only when other rooms exist.
            if room.name == "Room 1" && plan.rooms.len() > 1 {
                continue;
            }
            graph.add_node(Node::room(&room.name, room.center));
        }
        for zone in &plan.zones {
            graph.add_node(Node::zone(&zone.kind, zone.center));
        }
        trace!("[GraphBuilder] phase 1: {} nodes", graph.node_count());
    }

    /// Phase 2: connect nodes with distance-weighted symmetric edges.
    pub fn connect_nodes(&self, plan: &FloorPlan, graph: &mut NavGraph) {
        self.connect_doors_to_rooms(plan, graph);
        for room in &plan.rooms {
            self.connect_room_interior(room, graph);
        }
        trace!("[GraphBuilder] phase 2: {} edges", graph.edges().len());
    }

    fn connect_doors_to_rooms(&self, plan: &FloorPlan, graph: &mut NavGraph) {
        for door in &plan.doors {
            let door_id = Node::door(door.position).id;
            for room in &plan.rooms {
                // Boundary-inclusive: a door on a shared wall belongs
                // to both rooms
                if room.contains(door.position) {
                    let room_id = Node::room(&room.name, room.center).id;
                    graph.connect_by_distance(&door_id, &room_id);
                }
            }
        }
    }

    fn connect_room_interior(&self, room: &Room, graph: &mut NavGraph) {
        let room_id = Node::room(&room.name, room.center).id;

        let mut features: Vec<String> = Vec::new();
        let mut doors: Vec<String> = Vec::new();
        for node in graph.nodes() {
            if !room.contains(node.position) {
                continue;
            }
            match node.kind {
                NodeKind::Poi | NodeKind::Window | NodeKind::Zone => {
                    features.push(node.id.clone());
                }
                NodeKind::Door => doors.push(node.id.clone()),
                _ => {}
            }
        }

        // Intra-room features: pairwise and to the room center
        for i in 0..features.len() {
            for j in (i + 1)..features.len() {
                graph.connect_by_distance(&features[i], &features[j]);
            }
            graph.connect_by_distance(&features[i], &room_id);
        }

        // POIs and windows to every door of the room
        for feature in &features {
            if feature.starts_with("zone:") {
                continue;
            }
            for door in &doors {
                graph.connect_by_distance(feature, door);
            }
        }
    }

    /// Phase 3: penalize edges whose segment crosses a danger zone.
    ///
    /// Computed into a fresh edge list and swapped in atomically; the
    /// live collection is never mutated while being iterated. Each edge
    /// is multiplied at most once no matter how many zones it crosses.
    pub fn apply_risk_penalties(&self, plan: &FloorPlan, graph: &mut NavGraph) {
        let danger: Vec<&crate::plan::Zone> =
            plan.zones.iter().filter(|z| z.is_danger()).collect();
        if danger.is_empty() {
            return;
        }

        let multiplier = self.config.risk_multiplier;
        let mut penalized = 0usize;
        let edges: Vec<Edge> = graph
            .edges()
            .iter()
            .map(|e| {
                let (a, b) = match (graph.node(&e.from), graph.node(&e.to)) {
                    (Some(a), Some(b)) => (a.position, b.position),
                    _ => return e.clone(),
                };
                let crosses = danger
                    .iter()
                    .any(|z| geometry::segment_intersects_polygon(a, b, &z.polygon));
                if crosses {
                    penalized += 1;
                    Edge { from: e.from.clone(), to: e.to.clone(), weight: e.weight * multiplier }
                } else {
                    e.clone()
                }
            })
            .collect();
        graph.set_edges(edges);
        trace!("[GraphBuilder] phase 3: {} edges penalized", penalized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use crate::plan::{Door, Poi, Room, Window, Zone};
    use std::collections::BTreeSet;

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
            // Door on the shared wall
            doors: vec![Door { position: Point2D::new(5.0, 2.5) }],
            pois: vec![
                Poi { name: "stove".to_string(), position: Point2D::new(1.0, 1.0) },
                Poi { name: "sofa".to_string(), position: Point2D::new(8.0, 1.0) },
            ],
            windows: vec![Window { position: Point2D::new(2.0, 5.0) }],
            ..Default::default()
        }
    }

    #[test]
    fn test_node_emission() {
        let plan = two_room_plan();
        let graph = GraphBuilder::with_defaults().build(&plan);

        assert!(graph.contains("door:5:2.5"));
        assert!(graph.contains("poi:stove"));
        assert!(graph.contains("poi:sofa"));
        assert!(graph.contains("window:2:5"));
        assert!(graph.contains("room:Kitchen"));
        assert!(graph.contains("room:Hall"));
    }

    #[test]
    fn test_room_1_skipped_only_with_other_rooms() {
        let mut plan = two_room_plan();
        plan.rooms[0].name = "Room 1".to_string();
        let graph = GraphBuilder::with_defaults().build(&plan);
        assert!(!graph.contains("room:Room 1"));
        assert!(graph.contains("room:Hall"));

        // Single-room plan keeps it
        plan.rooms.truncate(1);
        let graph = GraphBuilder::with_defaults().build(&plan);
        assert!(graph.contains("room:Room 1"));
    }

    #[test]
    fn test_door_on_shared_wall_connects_both_rooms() {
        let plan = two_room_plan();
        let graph = GraphBuilder::with_defaults().build(&plan);
        assert!(graph.has_edge("door:5:2.5", "room:Kitchen"));
        assert!(graph.has_edge("door:5:2.5", "room:Hall"));
    }

    #[test]
    fn test_poi_connects_to_room_door_and_center() {
        let plan = two_room_plan();
        let graph = GraphBuilder::with_defaults().build(&plan);
        assert!(graph.has_edge("poi:stove", "room:Kitchen"));
        assert!(graph.has_edge("poi:stove", "door:5:2.5"));
        assert!(graph.has_edge("poi:stove", "window:2:5"));
        // Not to the other room's feature directly
        assert!(!graph.has_edge("poi:stove", "poi:sofa"));
    }

    #[test]
    fn test_graph_symmetry() {
        let plan = two_room_plan();
        let graph = GraphBuilder::with_defaults().build(&plan);
        for e in graph.edges() {
            assert!(
                graph
                    .edges()
                    .iter()
                    .any(|r| r.from == e.to && r.to == e.from && r.weight == e.weight),
                "missing reverse of {} -> {}",
                e.from,
                e.to
            );
        }
    }

    #[test]
    fn test_idempotent_node_ids() {
        let plan = two_room_plan();
        let builder = GraphBuilder::with_defaults();
        let ids1: BTreeSet<String> = builder.build(&plan).nodes().map(|n| n.id.clone()).collect();
        let ids2: BTreeSet<String> = builder.build(&plan).nodes().map(|n| n.id.clone()).collect();
        assert_eq!(ids1, ids2);
    }

    #[test]
    fn test_danger_penalty_applied_exactly_once() {
        let mut plan = two_room_plan();
        // Danger zone straddling the stove-to-door segment
        plan.zones.push(Zone {
            polygon: square(2.0, 0.5, 2.0),
            kind: "danger".to_string(),
            center: Point2D::new(3.0, 1.5),
        });
        // A second overlapping danger zone must not double the penalty
        plan.zones.push(Zone {
            polygon: square(2.5, 0.5, 2.0),
            kind: "danger".to_string(),
            center: Point2D::new(3.5, 1.5),
        });

        let builder = GraphBuilder::with_defaults();
        let mut graph = NavGraph::new();
        builder.add_navigable_elements(&plan, &mut graph);
        builder.connect_nodes(&plan, &mut graph);

        let before: f32 = graph
            .edges()
            .iter()
            .find(|e| e.from == "poi:stove" && e.to == "door:5:2.5")
            .unwrap()
            .weight;

        builder.apply_risk_penalties(&plan, &mut graph);

        let after: f32 = graph
            .edges()
            .iter()
            .find(|e| e.from == "poi:stove" && e.to == "door:5:2.5")
            .unwrap()
            .weight;
        assert!((after - before * 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_danger_zone_does_not_penalize() {
        let mut plan = two_room_plan();
        plan.zones.push(Zone {
            polygon: square(2.0, 0.5, 2.0),
            kind: "quiet".to_string(),
            center: Point2D::new(3.0, 1.5),
        });

        let builder = GraphBuilder::with_defaults();
        let mut graph = NavGraph::new();
        builder.add_navigable_elements(&plan, &mut graph);
        builder.connect_nodes(&plan, &mut graph);
        let before = graph.edges().to_vec();
        builder.apply_risk_penalties(&plan, &mut graph);
        assert_eq!(before, graph.edges());
    }
}
