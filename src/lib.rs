// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Mapgraph library - weighted point maps with shortest-path queries
//!
//! A map is a set of labeled points on a plane joined by directed, weighted
//! connections. [`store::MapStore`] owns both collections together with a
//! [`graph::GraphIndex`] over point ids and persists them as two JSON
//! documents (`vertices.json`, `edges.json`) through [`storage`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod graph;
pub mod storage;
pub mod store;

/// Core entity records persisted in the map directory
pub mod types {
    use serde::{Deserialize, Serialize};

    /// Identifier of a point or a connection, assigned by the caller
    pub type Id = u32;

    // =========================================================================
    // Point (Vertex)
    // =========================================================================

    /// A labeled location on the map.
    ///
    /// Field order is the on-disk order: `{id, label, x, y}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Point {
        /// Unique identifier
        pub id: Id,
        /// Free text label
        pub label: String,
        /// Horizontal coordinate
        pub x: f64,
        /// Vertical coordinate
        pub y: f64,
    }

    impl Point {
        /// Create a point labeled with its own id
        #[must_use]
        pub fn new(id: Id, x: f64, y: f64) -> Self {
            Self {
                id,
                label: id.to_string(),
                x,
                y,
            }
        }

        /// Create a point with an explicit label
        #[must_use]
        pub fn with_label(id: Id, label: impl Into<String>, x: f64, y: f64) -> Self {
            Self {
                id,
                label: label.into(),
                x,
                y,
            }
        }

        /// Euclidean distance to another point
        #[must_use]
        pub fn distance_to(&self, other: &Point) -> f64 {
            (self.x - other.x).hypot(self.y - other.y)
        }
    }

    // =========================================================================
    // Connection (Edge)
    // =========================================================================

    /// A directed, weighted connection between two points.
    ///
    /// Field order is the on-disk order: `{id, weight, from, to}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Connection {
        /// Unique identifier
        pub id: Id,
        /// Non-negative cost of travelling along the connection
        pub weight: f64,
        /// Source point id
        pub from: Id,
        /// Target point id
        pub to: Id,
    }

    impl Connection {
        /// Create a connection with an explicit weight
        #[must_use]
        pub fn new(id: Id, from: Id, to: Id, weight: f64) -> Self {
            Self {
                id,
                weight,
                from,
                to,
            }
        }

        /// Create a connection weighted by the distance between its endpoints
        #[must_use]
        pub fn between(id: Id, from: &Point, to: &Point) -> Self {
            Self::new(id, from.id, to.id, from.distance_to(to))
        }

        /// True if the connection starts or ends at `point`
        #[must_use]
        pub fn touches(&self, point: Id) -> bool {
            self.from == point || self.to == point
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{MapError, Result};
    pub use crate::graph::GraphIndex;
    pub use crate::store::MapStore;
    pub use crate::types::*;
}
