// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Init command - creates an empty map directory

use super::Session;
use anyhow::Result;
use mapgraph::storage;
use mapgraph::store::MapStore;
use tracing::info;

/// Run the init command
pub fn run(session: &Session, force: bool) -> Result<()> {
    if storage::is_map_dir(&session.map_dir) && !force {
        anyhow::bail!(
            "A map already exists in {}. Use --force to replace it.",
            session.map_dir.display()
        );
    }

    info!("Creating map in {}", session.map_dir.display());
    session.save_store(&MapStore::new())?;
    session.status(&format!("New map created in {}.", session.map_dir.display()));
    Ok(())
}
