// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Path command - shortest route between two points

use super::{join_ids, Session};
use anyhow::Result;
use mapgraph::error::MapError;
use mapgraph::types::Id;
use serde_json::json;

/// Run path command
pub fn run(session: &Session, from: Id, to: Id) -> Result<()> {
    let store = session.load_store()?;

    if from == to {
        anyhow::bail!("Select two different vertices to find a shortest path.");
    }
    for id in [from, to] {
        if !store.contains_vertex(id) {
            anyhow::bail!("Vertex {} not found", id);
        }
    }

    let distance = match store.shortest_path_by_distance(from, to) {
        Ok(distance) => distance,
        Err(MapError::NoPath { .. }) => {
            if session.json {
                return session.print_json(&json!({ "from": from, "to": to, "found": false }));
            }
            session.status("No path found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let vertices = store.shortest_path_by_vertex(from, to);
    let edges = store.shortest_path_by_edge(from, to);

    if session.json {
        return session.print_json(&json!({
            "from": from,
            "to": to,
            "found": true,
            "distance": distance,
            "vertices": vertices,
            "edges": edges,
        }));
    }

    session.status(&format!(
        "Shortest path found with distance {}.",
        session.number(distance)
    ));
    println!("  vertices: {}", join_ids(&vertices));
    println!("  edges: {}", join_ids(&edges));
    Ok(())
}
