// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `MAPGRAPH_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override configuration keys
pub const ENV_PREFIX: &str = "MAPGRAPH";

/// Keys accepted in the configuration file
pub const KEYS: &[&str] = &["map_dir", "log_level", "precision"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Map directory used when none is given on the command line
    pub map_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Decimals shown when printing weights and distances
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_dir: PathBuf::from("map"),
            log_level: "info".to_string(),
            precision: 2,
        }
    }
}

impl Config {
    /// Value of a single key, rendered for display
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "map_dir" => Some(self.map_dir.display().to_string()),
            "log_level" => Some(self.log_level.clone()),
            "precision" => Some(self.precision.to_string()),
            _ => None,
        }
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("org", "hyperpolymath", "mapgraph")
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".mapgraph.toml"))
}

/// Load configuration, reading `path` if it exists
pub fn load(path: &Path) -> Result<Config> {
    let defaults = Config::default();
    let settings = config::Config::builder()
        .set_default("map_dir", defaults.map_dir.display().to_string())?
        .set_default("log_level", defaults.log_level)?
        .set_default("precision", i64::try_from(defaults.precision)?)?
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Persist one key into the configuration file at `path`.
///
/// Other keys already in the file are kept.
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let value = match key {
        "precision" => {
            let digits: i64 = value
                .parse()
                .with_context(|| format!("precision must be a whole number, got {value}"))?;
            if !(0..=12).contains(&digits) {
                anyhow::bail!("precision must be between 0 and 12, got {}", digits);
            }
            toml::Value::Integer(digits)
        }
        "map_dir" | "log_level" => toml::Value::String(value.to_string()),
        other => anyhow::bail!("Unknown config key: {}. Valid: {}", other, KEYS.join(", ")),
    };
    table.insert(key.to_string(), value);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(&table).context("Failed to serialize configuration")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
