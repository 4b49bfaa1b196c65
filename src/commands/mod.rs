// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod edge;
pub mod init;
pub mod path;
pub mod search;
pub mod vertex;

use anyhow::{Context, Result};
use mapgraph::storage;
use mapgraph::store::MapStore;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Settings shared by every command for one invocation
pub struct Session {
    /// Map directory the command reads and writes
    pub map_dir: PathBuf,
    /// Print machine-readable JSON instead of status lines
    pub json: bool,
    /// Colorize status lines
    pub color: bool,
    /// Decimals shown for weights and distances
    pub precision: usize,
}

impl Session {
    /// Load the map, or start an empty one if the directory holds no map yet
    pub fn load_store(&self) -> Result<MapStore> {
        if !storage::is_map_dir(&self.map_dir) {
            debug!("No map in {}, starting empty", self.map_dir.display());
            return Ok(MapStore::new());
        }
        MapStore::load(&self.map_dir)
            .with_context(|| format!("Failed to load map from {}", self.map_dir.display()))
    }

    /// Write the map back to the session's directory
    pub fn save_store(&self, store: &MapStore) -> Result<()> {
        store
            .save(&self.map_dir)
            .with_context(|| format!("Failed to save map to {}", self.map_dir.display()))
    }

    /// Print a one-line status message
    pub fn status(&self, message: &str) {
        if self.json {
            return;
        }
        if self.color {
            println!("{}", message.green());
        } else {
            println!("{message}");
        }
    }

    /// Format a weight or distance with the configured precision
    #[must_use]
    pub fn number(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{json}");
        Ok(())
    }
}

/// Render a list of ids as `a, b, c`
#[must_use]
pub fn join_ids(ids: &[u32]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
