//! Single-source shortest path over the navigation graph.

use super::{NavGraph, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Heap entry keyed by running distance
#[derive(Clone, Debug)]
struct QueueEntry {
    id: NodeId,
    cost: f32,
}

impl Eq for QueueEntry {}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classic Dijkstra relaxation returning the ordered node-id path.
///
/// Returns an empty path when either id is absent from the graph or
/// when the destination is unreachable. A same-node request returns the
/// single-node path.
pub fn shortest_path(graph: &NavGraph, start: &str, end: &str) -> Vec<NodeId> {
    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }
    if start == end {
        return vec![start.to_string()];
    }

    let mut adjacency: HashMap<&str, Vec<(&str, f32)>> = HashMap::new();
    for edge in graph.edges() {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push((edge.to.as_str(), edge.weight));
    }

    let mut dist: HashMap<String, f32> = HashMap::new();
    let mut prev: HashMap<String, String> = HashMap::new();
    let mut queue = BinaryHeap::new();

    dist.insert(start.to_string(), 0.0);
    queue.push(QueueEntry { id: start.to_string(), cost: 0.0 });

    while let Some(entry) = queue.pop() {
        if entry.id == end {
            break;
        }
        let current = dist.get(&entry.id).copied().unwrap_or(f32::INFINITY);
        if entry.cost > current {
            continue; // stale queue entry
        }

        let Some(neighbors) = adjacency.get(entry.id.as_str()) else {
            continue;
        };
        for &(next, weight) in neighbors {
            let tentative = entry.cost + weight;
            let best = dist.get(next).copied().unwrap_or(f32::INFINITY);
            if tentative < best {
                dist.insert(next.to_string(), tentative);
                prev.insert(next.to_string(), entry.id.clone());
                queue.push(QueueEntry { id: next.to_string(), cost: tentative });
            }
        }
    }

    if !dist.contains_key(end) {
        return Vec::new();
    }

    // Walk predecessors backward from the destination
    let mut path = vec![end.to_string()];
    let mut cursor = end.to_string();
    while let Some(p) = prev.get(&cursor) {
        path.push(p.clone());
        cursor = p.clone();
    }
    path.reverse();
    if path.first().map(String::as_str) != Some(start) {
        return Vec::new();
    }
    path
}
