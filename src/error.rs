// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the map engine
//!
//! Every fallible operation on [`crate::store::MapStore`], the graph index and
//! the on-disk codec returns [`MapError`]. The store never swallows these; the
//! caller decides whether a failure is recoverable.

use crate::types::Id;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Failure modes of the map engine
#[derive(Debug, Error)]
pub enum MapError {
    /// A map file or directory could not be read, written or created.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory the operation touched
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A map file does not have the expected JSON shape, or refers to
    /// points that do not exist.
    #[error("malformed map file {}: {message}", path.display())]
    Format {
        /// Offending file
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// No path connects the two points, or one of them does not exist.
    #[error("no path from point {from} to point {to}")]
    NoPath {
        /// Start point id
        from: Id,
        /// End point id
        to: Id,
    },

    /// A mutation referenced a point id the store does not hold.
    #[error("unknown point: {0}")]
    UnknownPoint(Id),

    /// A mutation referenced a connection id the store does not hold.
    #[error("unknown connection: {0}")]
    UnknownConnection(Id),

    /// A point coordinate was NaN or infinite.
    #[error("point {id} has invalid position ({x}, {y})")]
    InvalidPosition {
        /// Point id
        id: Id,
        /// Rejected horizontal coordinate
        x: f64,
        /// Rejected vertical coordinate
        y: f64,
    },

    /// A connection weight was negative, NaN or infinite.
    #[error("connection {id} has invalid weight {weight}")]
    InvalidWeight {
        /// Connection id
        id: Id,
        /// Rejected weight
        weight: f64,
    },

    /// The entity collections and the graph index disagree. This is a bug in
    /// mutation sequencing, never an input error.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl MapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for errors after which the store should be discarded and
    /// reinitialized rather than used further.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}
