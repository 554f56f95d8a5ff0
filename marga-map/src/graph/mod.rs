//! Navigable-feature graph: nodes for doors, windows, POIs, room and
//! zone centers, with symmetric weighted edges.
//!
//! A graph lives for exactly one path computation. It is rebuilt per
//! request so query-specific temporary nodes never leak between
//! unrelated queries.

pub mod builder;
pub mod dijkstra;

pub use builder::GraphBuilder;
pub use dijkstra::shortest_path;

use crate::core::Point2D;
use std::collections::HashMap;

/// Node identifier, derived deterministically from the feature
pub type NodeId = String;

/// What kind of floor-plan feature a node represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Door,
    Room,
    Poi,
    Window,
    Zone,
    /// Query-scoped node synthesized for a free coordinate
    Temp,
}

/// A graph node. Identity is the `id`; ids are derived from the feature
/// kind and its stable key so repeated builds of the same plan are
/// idempotent.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Point2D,
    pub kind: NodeKind,
}

impl Node {
    pub fn door(position: Point2D) -> Self {
        Self { id: format!("door:{}:{}", position.x, position.y), position, kind: NodeKind::Door }
    }

    pub fn window(position: Point2D) -> Self {
        Self {
            id: format!("window:{}:{}", position.x, position.y),
            position,
            kind: NodeKind::Window,
        }
    }

    pub fn poi(name: &str, position: Point2D) -> Self {
        Self { id: format!("poi:{name}"), position, kind: NodeKind::Poi }
    }

    pub fn room(name: &str, center: Point2D) -> Self {
        Self { id: format!("room:{name}"), position: center, kind: NodeKind::Room }
    }

    pub fn zone(kind: &str, center: Point2D) -> Self {
        Self {
            id: format!("zone:{kind}:{}:{}", center.x, center.y),
            position: center,
            kind: NodeKind::Zone,
        }
    }

    pub fn temp(label: &str, position: Point2D) -> Self {
        Self { id: format!("temp:{label}"), position, kind: NodeKind::Temp }
    }
}

/// Directed weighted edge. The graph is logically undirected: every
/// connection exists as a symmetric pair of these.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f32,
}

/// The navigation graph for one path computation.
#[derive(Clone, Debug, Default)]
pub struct NavGraph {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns false (and leaves the graph unchanged)
    /// if a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Connect two nodes with a symmetric edge pair.
    ///
    /// Skipped silently when either node is absent; a room without a
    /// modeled center simply drops that connection.
    pub fn connect(&mut self, a: &str, b: &str, weight: f32) {
        if !self.contains(a) || !self.contains(b) || a == b {
            return;
        }
        self.edges.push(Edge { from: a.to_string(), to: b.to_string(), weight });
        self.edges.push(Edge { from: b.to_string(), to: a.to_string(), weight });
    }

    /// Connect two nodes with weight = Euclidean distance between them.
    pub fn connect_by_distance(&mut self, a: &str, b: &str) {
        let weight = match (self.node(a), self.node(b)) {
            (Some(na), Some(nb)) => na.position.distance(&nb.position),
            _ => return,
        };
        self.connect(a, b, weight);
    }

    /// Replace the full edge list. Used by the risk-penalty pass, which
    /// computes into a fresh list and swaps it in atomically instead of
    /// mutating while iterating.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Remove a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_some() {
            self.edges.retain(|e| e.from != id && e.to != id);
        }
    }

    /// Whether an edge between the two ids already exists (either direction).
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges.iter().any(|e| e.from == a && e.to == b)
    }
}
