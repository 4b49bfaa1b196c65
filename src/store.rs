// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! The map store: points, connections and their graph index kept in step

use crate::error::{MapError, Result};
use crate::graph::GraphIndex;
use crate::storage;
use crate::types::{Connection, Id, Point};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Owner of a map's points and connections.
///
/// Every point has a node in the index and every connection has an arc from
/// `from` to `to`. Parallel connections share one arc carrying the smallest
/// of their weights. Each public method leaves the collections and the index
/// consistent when it returns.
#[derive(Debug, Clone, Default)]
pub struct MapStore {
    vertices: BTreeMap<Id, Point>,
    edges: BTreeMap<Id, Connection>,
    /// Connection ids per `(from, to)` pair, ascending
    parallel: BTreeMap<(Id, Id), Vec<Id>>,
    index: GraphIndex,
}

/// Largest gap at which a weight still counts as the distance between its
/// endpoints
const DISTANCE_TOLERANCE: f64 = 1e-9;

impl MapStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a map directory
    pub fn load(dir: &Path) -> Result<Self> {
        let points = storage::load_points(dir)?;
        let connections = storage::load_connections(dir)?;
        Self::from_parts(points, connections, &storage::edges_path(dir), &storage::vertices_path(dir))
    }

    /// Build a store from loaded collections, rejecting duplicates and
    /// dangling references instead of silently skipping them.
    fn from_parts(
        points: Vec<Point>,
        connections: Vec<Connection>,
        edges_file: &Path,
        vertices_file: &Path,
    ) -> Result<Self> {
        let mut store = Self::new();

        for point in points {
            if store.contains_vertex(point.id) {
                return Err(MapError::format(
                    vertices_file,
                    format!("duplicate point id {}", point.id),
                ));
            }
            store
                .add_vertex(point)
                .map_err(|e| MapError::format(vertices_file, e))?;
        }

        for connection in connections {
            if store.contains_edge(connection.id) {
                return Err(MapError::format(
                    edges_file,
                    format!("duplicate connection id {}", connection.id),
                ));
            }
            store
                .add_edge(connection)
                .map_err(|e| MapError::format(edges_file, e))?;
        }

        Ok(store)
    }

    /// Replace the whole state with the map stored in `dir`.
    ///
    /// The new state is assembled separately, so on error the current
    /// contents are left untouched.
    pub fn open(&mut self, dir: &Path) -> Result<()> {
        let loaded = Self::load(dir)?;
        *self = loaded;
        info!(
            "Opened map {} ({} points, {} connections)",
            dir.display(),
            self.vertex_count(),
            self.edge_count()
        );
        Ok(())
    }

    /// Write both map documents to `dir`, creating the directory if needed.
    ///
    /// Writes are staged, so a failure leaves any previous pair in place. A
    /// store that fails [`MapStore::check_invariants`] is not written, since
    /// [`MapStore::open`] would reject the result.
    pub fn save(&self, dir: &Path) -> Result<()> {
        self.check_invariants()?;
        fs::create_dir_all(dir).map_err(|e| MapError::io(dir, e))?;
        storage::stage(self.vertices.values(), self.edges.values(), dir)?.commit()?;
        info!(
            "Saved map {} ({} points, {} connections)",
            dir.display(),
            self.vertex_count(),
            self.edge_count()
        );
        Ok(())
    }

    /// Drop every point and connection
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.parallel.clear();
        self.index.clear();
        info!("Cleared map");
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add a point. A point whose id is already present is ignored.
    ///
    /// Both coordinates must be finite; otherwise nothing changes.
    pub fn add_vertex(&mut self, point: Point) -> Result<()> {
        if self.vertices.contains_key(&point.id) {
            debug!("Point {} already present", point.id);
            return Ok(());
        }
        check_position(point.id, point.x, point.y)?;
        self.index.insert_vertex(point.id);
        debug!("Added point {} ({})", point.id, point.label);
        self.vertices.insert(point.id, point);
        Ok(())
    }

    /// Add a connection. A connection whose id is already present is ignored.
    ///
    /// Both endpoints must be present and the weight must be finite and
    /// non-negative; otherwise nothing changes.
    pub fn add_edge(&mut self, mut connection: Connection) -> Result<()> {
        if self.edges.contains_key(&connection.id) {
            debug!("Connection {} already present", connection.id);
            return Ok(());
        }
        connection.weight = check_weight(connection.id, connection.weight)?;
        for endpoint in [connection.from, connection.to] {
            if !self.vertices.contains_key(&endpoint) {
                return Err(MapError::UnknownPoint(endpoint));
            }
        }

        let (from, to) = (connection.from, connection.to);
        debug!("Added connection {} ({} -> {})", connection.id, from, to);
        let ids = self.parallel.entry((from, to)).or_default();
        if let Err(slot) = ids.binary_search(&connection.id) {
            ids.insert(slot, connection.id);
        }
        self.edges.insert(connection.id, connection);
        self.sync_arc(from, to);
        Ok(())
    }

    /// Remove a point. Unknown ids are ignored.
    ///
    /// Incident connections are not removed: callers remove them first (see
    /// [`MapStore::remove_vertex_cascade`]). Any left behind stay in the
    /// collection and are reported by [`MapStore::check_invariants`].
    pub fn remove_vertex(&mut self, id: Id) {
        let Some(point) = self.vertices.remove(&id) else {
            return;
        };
        let dangling = self.edges.values().filter(|c| c.touches(id)).count();
        if dangling > 0 {
            warn!(
                "Removed point {} with {} connection(s) still attached",
                id, dangling
            );
        }
        self.index.remove_vertex(id);
        debug!("Removed point {} ({})", id, point.label);
    }

    /// Remove every connection touching a point, then the point itself.
    ///
    /// Returns the ids of the removed connections.
    pub fn remove_vertex_cascade(&mut self, id: Id) -> Vec<Id> {
        if !self.vertices.contains_key(&id) {
            return Vec::new();
        }
        let incident: Vec<Id> = self.incident_edges(id).iter().map(|c| c.id).collect();
        for edge_id in &incident {
            self.remove_edge(*edge_id);
        }
        self.remove_vertex(id);
        incident
    }

    /// Remove a connection. Unknown ids are ignored.
    pub fn remove_edge(&mut self, id: Id) {
        if let Some(connection) = self.edges.remove(&id) {
            let pair = (connection.from, connection.to);
            if let Some(ids) = self.parallel.get_mut(&pair) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.parallel.remove(&pair);
                }
            }
            self.sync_arc(connection.from, connection.to);
            debug!("Removed connection {}", id);
        }
    }

    /// Move a point. Setting the current position again is a no-op.
    ///
    /// Connection weights are left as they are; see [`MapStore::move_vertex`].
    pub fn set_vertex_position(&mut self, id: Id, x: f64, y: f64) -> Result<()> {
        let point = self.vertices.get_mut(&id).ok_or(MapError::UnknownPoint(id))?;
        check_position(id, x, y)?;
        if point.x == x && point.y == y {
            return Ok(());
        }
        point.x = x;
        point.y = y;
        debug!("Moved point {} to ({}, {})", id, x, y);
        Ok(())
    }

    /// Move a point and keep distance-weighted connections in step.
    ///
    /// Every incident connection whose weight equals the distance between its
    /// endpoints before the move is reweighed to the distance after it.
    /// Connections with any other weight keep it. Returns the ids of the
    /// reweighed connections.
    pub fn move_vertex(&mut self, id: Id, x: f64, y: f64) -> Result<Vec<Id>> {
        if !self.vertices.contains_key(&id) {
            return Err(MapError::UnknownPoint(id));
        }
        check_position(id, x, y)?;

        let follow: Vec<Id> = self
            .incident_edges(id)
            .into_iter()
            .filter(|c| {
                self.connection_length(c.id)
                    .is_some_and(|d| (c.weight - d).abs() <= DISTANCE_TOLERANCE)
            })
            .map(|c| c.id)
            .collect();

        self.set_vertex_position(id, x, y)?;
        for edge_id in &follow {
            if let Some(length) = self.connection_length(*edge_id) {
                self.set_edge_weight(*edge_id, length)?;
            }
        }
        Ok(follow)
    }

    /// Change a connection's weight. Setting the current weight again is a
    /// no-op.
    ///
    /// The weight must be finite and non-negative; otherwise nothing changes.
    pub fn set_edge_weight(&mut self, id: Id, weight: f64) -> Result<()> {
        let weight = check_weight(id, weight)?;
        let connection = self
            .edges
            .get_mut(&id)
            .ok_or(MapError::UnknownConnection(id))?;
        if connection.weight.to_bits() == weight.to_bits() {
            return Ok(());
        }
        connection.weight = weight;
        let (from, to) = (connection.from, connection.to);
        self.sync_arc(from, to);
        debug!("Reweighed connection {} to {}", id, weight);
        Ok(())
    }

    /// Relabel a point. Setting the current label again is a no-op.
    pub fn set_vertex_label(&mut self, id: Id, label: &str) -> Result<()> {
        let point = self.vertices.get_mut(&id).ok_or(MapError::UnknownPoint(id))?;
        if point.label == label {
            return Ok(());
        }
        label.clone_into(&mut point.label);
        debug!("Relabeled point {} to {:?}", id, label);
        Ok(())
    }

    /// Connections running `from -> to`, ascending by id
    fn connections_between(&self, from: Id, to: Id) -> impl Iterator<Item = &Connection> + '_ {
        self.parallel
            .get(&(from, to))
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    /// Re-derive the arc `from -> to` from the connections that remain
    fn sync_arc(&mut self, from: Id, to: Id) {
        let weight = self
            .connections_between(from, to)
            .map(|c| c.weight)
            .reduce(f64::min);

        match weight {
            Some(w) => {
                self.index.insert_edge(from, to, w);
            }
            None => {
                self.index.remove_edge(from, to);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Ids of the points whose label equals `label` exactly
    #[must_use]
    pub fn search_by_label(&self, label: &str) -> Vec<Id> {
        self.vertices
            .values()
            .filter(|p| p.label == label)
            .map(|p| p.id)
            .collect()
    }

    /// Ids of the connections whose weight matches `weight` to two decimals
    #[must_use]
    pub fn search_by_weight(&self, weight: f64) -> Vec<Id> {
        let wanted = two_decimals(weight);
        self.edges
            .values()
            .filter(|c| two_decimals(c.weight) == wanted)
            .map(|c| c.id)
            .collect()
    }

    /// Total weight of the shortest path between two points
    pub fn shortest_path_by_distance(&self, from: Id, to: Id) -> Result<f64> {
        self.index.path_cost(from, to)
    }

    /// Point ids along the shortest path, both endpoints included.
    ///
    /// Empty when there is no path.
    #[must_use]
    pub fn shortest_path_by_vertex(&self, from: Id, to: Id) -> Vec<Id> {
        self.index.shortest_path(from, to)
    }

    /// Connection ids along the shortest path.
    ///
    /// Each hop uses the lightest connection in that direction, the lowest id
    /// winning a tie. Empty when there is no path or `from == to`.
    #[must_use]
    pub fn shortest_path_by_edge(&self, from: Id, to: Id) -> Vec<Id> {
        let path = self.index.shortest_path(from, to);
        let mut hops = Vec::with_capacity(path.len().saturating_sub(1));

        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let lightest = self
                .connections_between(a, b)
                .fold(None::<&Connection>, |best, c| match best {
                    Some(best) if best.weight <= c.weight => Some(best),
                    _ => Some(c),
                });

            match lightest {
                Some(c) => hops.push(c.id),
                None => error!("Index has arc {} -> {} with no connection behind it", a, b),
            }
        }

        hops
    }

    /// All points, ordered by id
    pub fn vertices(&self) -> impl Iterator<Item = &Point> + '_ {
        self.vertices.values()
    }

    /// All connections, ordered by id
    pub fn edges(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.edges.values()
    }

    /// Get a point by id
    #[must_use]
    pub fn vertex(&self, id: Id) -> Option<&Point> {
        self.vertices.get(&id)
    }

    /// Get a connection by id
    #[must_use]
    pub fn edge(&self, id: Id) -> Option<&Connection> {
        self.edges.get(&id)
    }

    /// Euclidean distance between a connection's endpoints.
    ///
    /// `None` if the connection or one of its endpoints is missing.
    #[must_use]
    pub fn connection_length(&self, id: Id) -> Option<f64> {
        let connection = self.edges.get(&id)?;
        let from = self.vertices.get(&connection.from)?;
        let to = self.vertices.get(&connection.to)?;
        Some(from.distance_to(to))
    }

    /// Connections starting or ending at a point
    #[must_use]
    pub fn incident_edges(&self, id: Id) -> Vec<&Connection> {
        self.edges.values().filter(|c| c.touches(id)).collect()
    }

    /// Is there a point with this id?
    #[must_use]
    pub fn contains_vertex(&self, id: Id) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Is there a connection with this id?
    #[must_use]
    pub fn contains_edge(&self, id: Id) -> bool {
        self.edges.contains_key(&id)
    }

    /// Number of points
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of connections
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the store holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Smallest point id above every id in use
    #[must_use]
    pub fn next_vertex_id(&self) -> Id {
        self.vertices.keys().next_back().map_or(0, |id| id + 1)
    }

    /// Smallest connection id above every id in use
    #[must_use]
    pub fn next_edge_id(&self) -> Id {
        self.edges.keys().next_back().map_or(0, |id| id + 1)
    }

    /// Read-only view of the graph index
    #[must_use]
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Verify that the collections and the graph index agree
    pub fn check_invariants(&self) -> Result<()> {
        for id in self.vertices.keys() {
            if !self.index.contains_vertex(*id) {
                return Err(MapError::InvariantViolation(format!(
                    "point {id} is not indexed"
                )));
            }
        }
        if self.index.vertex_count() != self.vertices.len() {
            return Err(MapError::InvariantViolation(format!(
                "index has {} nodes for {} points",
                self.index.vertex_count(),
                self.vertices.len()
            )));
        }

        let mut arcs: BTreeMap<(Id, Id), f64> = BTreeMap::new();
        for c in self.edges.values() {
            if !self.vertices.contains_key(&c.from) || !self.vertices.contains_key(&c.to) {
                return Err(MapError::InvariantViolation(format!(
                    "connection {} refers to a missing point ({} -> {})",
                    c.id, c.from, c.to
                )));
            }
            arcs.entry((c.from, c.to))
                .and_modify(|w| *w = w.min(c.weight))
                .or_insert(c.weight);
        }

        for ((from, to), weight) in &arcs {
            if self.index.weight(*from, *to) != Some(*weight) {
                return Err(MapError::InvariantViolation(format!(
                    "arc {from} -> {to} does not carry weight {weight}"
                )));
            }
        }
        if self.index.edge_count() != arcs.len() {
            return Err(MapError::InvariantViolation(format!(
                "index has {} arcs for {} connected pairs",
                self.index.edge_count(),
                arcs.len()
            )));
        }

        Ok(())
    }
}

fn check_position(id: Id, x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(MapError::InvalidPosition { id, x, y })
    }
}

/// Validated weight with negative zero folded into zero
fn check_weight(id: Id, weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(MapError::InvalidWeight { id, weight });
    }
    Ok(weight + 0.0)
}

fn two_decimals(value: f64) -> String {
    // `-0.0` and small negatives would otherwise print as "-0.00"
    let rounded = format!("{:.2}", value + 0.0);
    match rounded.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_owned(),
        _ => rounded,
    }
}
