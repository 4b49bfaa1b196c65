// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Search command - find points by label or connections by weight

use super::{join_ids, Session};
use anyhow::Result;

/// Run search command
pub fn run(session: &Session, by: &str, value: &str) -> Result<()> {
    let store = session.load_store()?;

    match by {
        "label" | "vertex" => {
            let found = store.search_by_label(value);
            if session.json {
                return session.print_json(&found);
            }
            if found.is_empty() {
                session.status(&format!("No vertex found with label: {value}."));
            } else {
                session.status(&format!(
                    "Found {} vertex(es) with label {}: {}",
                    found.len(),
                    value,
                    join_ids(&found)
                ));
            }
        }

        "weight" | "edge" => {
            let weight: f64 = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid edge weight: {}", value))?;
            if !weight.is_finite() {
                anyhow::bail!("Invalid edge weight: {}", value);
            }

            let found = store.search_by_weight(weight);
            if session.json {
                return session.print_json(&found);
            }
            let shown = session.number(weight);
            if found.is_empty() {
                session.status(&format!("No edge found with weight: {shown}."));
            } else {
                session.status(&format!(
                    "Found {} edge(s) with weight {}: {}",
                    found.len(),
                    shown,
                    join_ids(&found)
                ));
            }
        }

        other => {
            anyhow::bail!("Unknown search: {}. Valid: label, weight", other);
        }
    }

    Ok(())
}
