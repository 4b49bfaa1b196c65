// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use anyhow::{Context, Result};
use mapgraph::config::{self, Config, KEYS};
use std::path::Path;

pub fn run(path: &Path, current: &Config, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            tracing::debug!("Showing configuration from {}", path.display());
            let rendered = toml::to_string_pretty(current).context("Failed to render configuration")?;
            println!("# {}", path.display());
            print!("{rendered}");
        }
        (Some(key), None) => {
            let shown = current.get(&key).ok_or_else(|| {
                anyhow::anyhow!("Unknown config key: {}. Valid: {}", key, KEYS.join(", "))
            })?;
            println!("{shown}");
        }
        (Some(key), Some(value)) => {
            tracing::info!("Setting {} = {}", key, value);
            config::set(path, &key, &value)?;
            println!("Set {} = {} in {}", key, value, path.display());
        }
    }
    Ok(())
}
