// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Directed weighted adjacency over point ids, with shortest-path queries

use crate::error::{MapError, Result};
use crate::types::{Id, Point};
use petgraph::algo::astar;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::EdgeRef;

/// Adjacency index keyed by point id.
///
/// The index holds ids only; the points themselves live in the store. At most
/// one arc exists per ordered `(from, to)` pair.
#[derive(Debug, Clone)]
pub struct GraphIndex {
    graph: DiGraphMap<Id, f64>,
}

impl Default for GraphIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraphMap::new(),
        }
    }

    /// Add a node for `id`. Returns false if it was already indexed.
    pub fn insert_vertex(&mut self, id: Id) -> bool {
        if self.graph.contains_node(id) {
            return false;
        }
        self.graph.add_node(id);
        true
    }

    /// Remove the node for `id` together with every arc touching it
    pub fn remove_vertex(&mut self, id: Id) -> bool {
        self.graph.remove_node(id)
    }

    /// Add or overwrite the arc `from -> to`.
    ///
    /// Both endpoints must already be indexed; otherwise nothing happens and
    /// false is returned.
    pub fn insert_edge(&mut self, from: Id, to: Id, weight: f64) -> bool {
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            return false;
        }
        self.graph.add_edge(from, to, weight);
        true
    }

    /// Add or overwrite the arc between two points, weighted by their distance
    pub fn insert_edge_by_distance(&mut self, from: &Point, to: &Point) -> bool {
        self.insert_edge(from.id, to.id, from.distance_to(to))
    }

    /// Remove the arc `from -> to` if present
    pub fn remove_edge(&mut self, from: Id, to: Id) -> bool {
        self.graph.remove_edge(from, to).is_some()
    }

    /// Is `id` indexed?
    #[must_use]
    pub fn contains_vertex(&self, id: Id) -> bool {
        self.graph.contains_node(id)
    }

    /// Is there an arc `from -> to`?
    #[must_use]
    pub fn contains_edge(&self, from: Id, to: Id) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Weight of the arc `from -> to`
    #[must_use]
    pub fn weight(&self, from: Id, to: Id) -> Option<f64> {
        self.graph.edge_weight(from, to).copied()
    }

    /// Number of indexed points
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of arcs
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True if no point is indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Drop every node and arc
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Minimum-weight path from `start` to `end`, both included.
    ///
    /// Empty when either endpoint is unknown or `end` is unreachable. A path
    /// from a point to itself is `[start]`.
    #[must_use]
    pub fn shortest_path(&self, start: Id, end: Id) -> Vec<Id> {
        self.search(start, end).map(|(_, path)| path).unwrap_or_default()
    }

    /// Total weight of the minimum-weight path from `start` to `end`
    pub fn path_cost(&self, start: Id, end: Id) -> Result<f64> {
        self.search(start, end)
            .map(|(cost, _)| cost)
            .ok_or(MapError::NoPath {
                from: start,
                to: end,
            })
    }

    /// Dijkstra, expressed as A* with a zero heuristic so the path comes back
    /// along with the cost.
    fn search(&self, start: Id, end: Id) -> Option<(f64, Vec<Id>)> {
        if !self.graph.contains_node(start) || !self.graph.contains_node(end) {
            return None;
        }
        astar(
            &self.graph,
            start,
            |node| node == end,
            |edge| *edge.weight(),
            |_| 0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -> 1 (3), 1 -> 2 (4), 0 -> 2 (10)
    fn triangle() -> GraphIndex {
        let mut index = GraphIndex::new();
        for id in 0..3 {
            index.insert_vertex(id);
        }
        index.insert_edge(0, 1, 3.0);
        index.insert_edge(1, 2, 4.0);
        index.insert_edge(0, 2, 10.0);
        index
    }

    #[test]
    fn test_insert_vertex_idempotent() {
        let mut index = GraphIndex::new();
        assert!(index.insert_vertex(5));
        assert!(!index.insert_vertex(5));
        assert_eq!(index.vertex_count(), 1);
    }

    #[test]
    fn test_edge_needs_both_endpoints() {
        let mut index = GraphIndex::new();
        index.insert_vertex(0);

        assert!(!index.insert_edge(0, 1, 1.0));
        assert!(!index.contains_vertex(1));
        assert_eq!(index.edge_count(), 0);
    }

    #[test]
    fn test_insert_edge_overwrites_weight() {
        let mut index = triangle();
        index.insert_edge(0, 1, 1.5);

        assert_eq!(index.weight(0, 1), Some(1.5));
        assert_eq!(index.edge_count(), 3);
    }

    #[test]
    fn test_insert_edge_by_distance() {
        let a = Point::new(0, 0.0, 0.0);
        let b = Point::new(1, 6.0, 8.0);
        let mut index = GraphIndex::new();
        index.insert_vertex(a.id);
        index.insert_vertex(b.id);

        assert!(index.insert_edge_by_distance(&a, &b));
        assert_eq!(index.weight(0, 1), Some(10.0));
        assert!(!index.contains_edge(1, 0));
    }

    #[test]
    fn test_remove_vertex_drops_incident_arcs() {
        let mut index = triangle();
        assert!(index.remove_vertex(1));

        assert!(!index.contains_edge(0, 1));
        assert!(!index.contains_edge(1, 2));
        assert!(index.contains_edge(0, 2));
        assert!(!index.remove_vertex(1));
    }

    #[test]
    fn test_shortest_path_prefers_cheaper_detour() {
        let index = triangle();

        assert_eq!(index.shortest_path(0, 2), vec![0, 1, 2]);
        assert!((index.path_cost(0, 2).unwrap() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shortest_path_respects_direction() {
        let index = triangle();

        assert!(index.shortest_path(2, 0).is_empty());
        assert!(matches!(
            index.path_cost(2, 0),
            Err(MapError::NoPath { from: 2, to: 0 })
        ));
    }

    #[test]
    fn test_no_path_after_removing_edge() {
        let mut index = triangle();
        index.remove_edge(1, 2);
        index.remove_edge(0, 2);

        assert!(index.shortest_path(0, 2).is_empty());
        assert!(index.path_cost(0, 2).is_err());
    }

    #[test]
    fn test_trivial_path() {
        let index = triangle();

        assert_eq!(index.shortest_path(1, 1), vec![1]);
        assert_eq!(index.path_cost(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_endpoint_is_no_path() {
        let index = triangle();

        assert!(index.shortest_path(0, 42).is_empty());
        assert!(index.shortest_path(42, 42).is_empty());
        assert!(index.path_cost(42, 0).is_err());
    }

    #[test]
    fn test_tie_break_is_stable() {
        // Two equal-cost routes 0 -> 1 -> 3 and 0 -> 2 -> 3
        let build = || {
            let mut index = GraphIndex::new();
            for id in 0..4 {
                index.insert_vertex(id);
            }
            index.insert_edge(0, 1, 1.0);
            index.insert_edge(0, 2, 1.0);
            index.insert_edge(1, 3, 1.0);
            index.insert_edge(2, 3, 1.0);
            index
        };

        let first = build().shortest_path(0, 3);
        for _ in 0..10 {
            assert_eq!(build().shortest_path(0, 3), first);
        }
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut index = triangle();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.edge_count(), 0);
    }
}
