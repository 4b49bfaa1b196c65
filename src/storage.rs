// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! On-disk codec for a map directory
//!
//! A map directory holds exactly two documents: `vertices.json`, an array of
//! `{id, label, x, y}` objects, and `edges.json`, an array of
//! `{id, weight, from, to}` objects. Both are pretty-printed; any valid JSON
//! whitespace is accepted on read.

use crate::error::{MapError, Result};
use crate::types::{Connection, Point};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the point collection
pub const VERTICES_FILE: &str = "vertices.json";
/// File name of the connection collection
pub const EDGES_FILE: &str = "edges.json";

const STAGING_EXTENSION: &str = "json.tmp";
const BACKUP_EXTENSION: &str = "json.bak";

/// Path of the point collection inside `dir`
#[must_use]
pub fn vertices_path(dir: &Path) -> PathBuf {
    dir.join(VERTICES_FILE)
}

/// Path of the connection collection inside `dir`
#[must_use]
pub fn edges_path(dir: &Path) -> PathBuf {
    dir.join(EDGES_FILE)
}

/// True if `dir` holds at least one of the two map documents
#[must_use]
pub fn is_map_dir(dir: &Path) -> bool {
    vertices_path(dir).exists() || edges_path(dir).exists()
}

/// Load the points stored in `dir`
pub fn load_points(dir: &Path) -> Result<Vec<Point>> {
    read_array(&vertices_path(dir))
}

/// Load the connections stored in `dir`
pub fn load_connections(dir: &Path) -> Result<Vec<Connection>> {
    read_array(&edges_path(dir))
}

/// Write `points` to `dir`, creating or overwriting the file
pub fn write_points<'a>(points: impl IntoIterator<Item = &'a Point>, dir: &Path) -> Result<()> {
    let points: Vec<&Point> = points.into_iter().collect();
    write_array(&vertices_path(dir), &points)
}

/// Write `connections` to `dir`, creating or overwriting the file
pub fn write_connections<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
    dir: &Path,
) -> Result<()> {
    let connections: Vec<&Connection> = connections.into_iter().collect();
    write_array(&edges_path(dir), &connections)
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
    let items: Vec<T> = serde_json::from_str(&content).map_err(|e| MapError::format(path, e))?;
    debug!("Read {} record(s) from {}", items.len(), path.display());
    Ok(items)
}

fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).map_err(|e| MapError::format(path, e))?;
    fs::write(path, json).map_err(|e| MapError::io(path, e))?;
    debug!("Wrote {} record(s) to {}", items.len(), path.display());
    Ok(())
}

// =============================================================================
// Staged writes
// =============================================================================

/// A complete map written next to the live files, waiting to replace them.
///
/// Dropping a `StagedMap` without committing removes the temporary files.
#[derive(Debug)]
pub struct StagedMap {
    dir: PathBuf,
    vertices_tmp: PathBuf,
    edges_tmp: PathBuf,
    committed: bool,
}

/// Write both documents to temporary siblings inside `dir`.
///
/// Nothing visible under the real file names changes until
/// [`StagedMap::commit`]. On failure the temporary files are removed.
pub fn stage<'a>(
    points: impl IntoIterator<Item = &'a Point>,
    connections: impl IntoIterator<Item = &'a Connection>,
    dir: &Path,
) -> Result<StagedMap> {
    let staged = StagedMap {
        dir: dir.to_path_buf(),
        vertices_tmp: vertices_path(dir).with_extension(STAGING_EXTENSION),
        edges_tmp: edges_path(dir).with_extension(STAGING_EXTENSION),
        committed: false,
    };

    let connections: Vec<&Connection> = connections.into_iter().collect();
    let points: Vec<&Point> = points.into_iter().collect();

    // On error `staged` is dropped here, which cleans up whatever was written.
    write_array(&staged.edges_tmp, &connections)?;
    write_array(&staged.vertices_tmp, &points)?;

    Ok(staged)
}

impl StagedMap {
    /// Move the staged documents over the live ones, edges first.
    ///
    /// If the second rename fails the previous edges file is put back, so the
    /// directory keeps either the old pair or the new pair.
    pub fn commit(mut self) -> Result<()> {
        let edges = edges_path(&self.dir);
        let vertices = vertices_path(&self.dir);
        let backup = edges.with_extension(BACKUP_EXTENSION);

        let had_edges = edges.exists();
        if had_edges {
            fs::rename(&edges, &backup).map_err(|e| MapError::io(&edges, e))?;
        }

        if let Err(e) = fs::rename(&self.edges_tmp, &edges) {
            if had_edges {
                restore(&backup, &edges);
            }
            return Err(MapError::io(&edges, e));
        }

        if let Err(e) = fs::rename(&self.vertices_tmp, &vertices) {
            if had_edges {
                restore(&backup, &edges);
            } else if let Err(e) = fs::remove_file(&edges) {
                warn!("Failed to remove {}: {}", edges.display(), e);
            }
            return Err(MapError::io(&vertices, e));
        }

        self.committed = true;
        if had_edges {
            if let Err(e) = fs::remove_file(&backup) {
                warn!("Failed to remove backup {}: {}", backup.display(), e);
            }
        }
        Ok(())
    }
}

fn restore(backup: &Path, live: &Path) {
    if let Err(e) = fs::rename(backup, live) {
        warn!(
            "Failed to restore {} from {}: {}",
            live.display(),
            backup.display(),
            e
        );
    }
}

impl Drop for StagedMap {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for tmp in [&self.edges_tmp, &self.vertices_tmp] {
            if tmp.exists() {
                if let Err(e) = fs::remove_file(tmp) {
                    warn!("Failed to remove staging file {}: {}", tmp.display(), e);
                }
            }
        }
    }
}
