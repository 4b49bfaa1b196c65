// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge management commands - create, reweigh and remove connections between points

use super::Session;
use anyhow::Result;
use mapgraph::types::{Connection, Id};

/// Arguments for edge commands
pub struct EdgeArgs {
    /// Target connection id
    pub id: Option<Id>,
    /// Source point id
    pub from: Option<Id>,
    /// Target point id
    pub to: Option<Id>,
    /// Explicit weight; defaults to the distance between the endpoints
    pub weight: Option<f64>,
}

/// Run edge command
pub fn run(session: &Session, action: &str, args: EdgeArgs) -> Result<()> {
    let mut store = session.load_store()?;

    match action {
        "add" | "create" | "draw" => {
            let from = args.from.ok_or_else(|| anyhow::anyhow!("--from is required"))?;
            let to = args.to.ok_or_else(|| anyhow::anyhow!("--to is required"))?;

            let source = store
                .vertex(from)
                .ok_or_else(|| anyhow::anyhow!("Vertex {} not found", from))?;
            let target = store
                .vertex(to)
                .ok_or_else(|| anyhow::anyhow!("Vertex {} not found", to))?;

            let id = store.next_edge_id();
            let connection = match args.weight {
                Some(weight) => Connection::new(id, from, to, weight),
                None => Connection::between(id, source, target),
            };

            store.add_edge(connection.clone())?;
            session.save_store(&store)?;

            if session.json {
                session.print_json(&connection)?;
            }
            session.status(&format!(
                "Edge {id} drawn from Vertex {from} to Vertex {to}."
            ));
            session.status(&format!("  weight: {}", session.number(connection.weight)));
        }

        "remove" | "delete" | "rm" => {
            let id = args
                .id
                .ok_or_else(|| anyhow::anyhow!("Edge id is required"))?;
            if !store.contains_edge(id) {
                anyhow::bail!("Edge {} not found", id);
            }

            store.remove_edge(id);
            session.save_store(&store)?;
            session.status(&format!("Edge {id} removed."));
        }

        "reweigh" | "weight" => {
            let id = args
                .id
                .ok_or_else(|| anyhow::anyhow!("Edge id is required"))?;
            if !store.contains_edge(id) {
                anyhow::bail!("Edge {} not found", id);
            }
            let weight = match args.weight {
                Some(weight) => weight,
                None => store
                    .connection_length(id)
                    .ok_or_else(|| anyhow::anyhow!("Edge {} has a missing endpoint", id))?,
            };

            store.set_edge_weight(id, weight)?;
            session.save_store(&store)?;
            session.status(&format!(
                "Edge {id} weight set to {}.",
                session.number(weight)
            ));
        }

        "list" | "ls" => {
            if session.json {
                return session.print_json(&store.edges().collect::<Vec<_>>());
            }
            if store.edge_count() == 0 {
                println!("No edges defined. Use 'mapgraph edge add' to create one.");
                return Ok(());
            }

            println!("Edges ({}):", store.edge_count());
            for c in store.edges() {
                let label_of = |id: Id| {
                    store
                        .vertex(id)
                        .map_or_else(|| id.to_string(), |p| p.label.clone())
                };
                println!(
                    "  {} : {} --[{}]--> {}",
                    c.id,
                    label_of(c.from),
                    session.number(c.weight),
                    label_of(c.to)
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, reweigh, list", other);
        }
    }

    Ok(())
}
