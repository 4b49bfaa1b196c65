// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Vertex commands - draw, move, relabel and remove points

use super::{join_ids, Session};
use anyhow::Result;
use mapgraph::store::MapStore;
use mapgraph::types::{Id, Point};

/// Arguments for vertex commands
pub struct VertexArgs {
    /// Target point id
    pub id: Option<Id>,
    /// Horizontal coordinate
    pub x: Option<f64>,
    /// Vertical coordinate
    pub y: Option<f64>,
    /// Point label
    pub label: Option<String>,
}

/// Run vertex command
pub fn run(session: &Session, action: &str, args: VertexArgs) -> Result<()> {
    let mut store = session.load_store()?;

    match action {
        "add" | "draw" => {
            let (x, y) = require_position(&args)?;
            let id = store.next_vertex_id();
            let point = match args.label {
                Some(label) => Point::with_label(id, label, x, y),
                None => Point::new(id, x, y),
            };

            store.add_vertex(point.clone())?;
            session.save_store(&store)?;

            if session.json {
                session.print_json(&point)?;
            }
            session.status(&format!("Vertex {id} drawn."));
        }

        "remove" | "delete" | "rm" => {
            let id = require_existing(&store, args.id)?;

            // Incident connections go first, the store never cascades on its own.
            let incident: Vec<Id> = store.incident_edges(id).iter().map(|c| c.id).collect();
            for edge_id in &incident {
                store.remove_edge(*edge_id);
            }
            store.remove_vertex(id);
            session.save_store(&store)?;

            session.status(&format!("Vertex {id} removed."));
            if !incident.is_empty() {
                session.status(&format!("  also removed edge(s): {}", join_ids(&incident)));
            }
        }

        "move" => {
            let id = require_existing(&store, args.id)?;
            let (x, y) = require_position(&args)?;

            // Edges drawn at the default distance follow the point
            let reweighed = store.move_vertex(id, x, y)?;
            session.save_store(&store)?;
            session.status(&format!(
                "Vertex {} moved to ({}, {}).",
                id,
                session.number(x),
                session.number(y)
            ));
            if !reweighed.is_empty() {
                session.status(&format!("  reweighed edge(s): {}", join_ids(&reweighed)));
            }
        }

        "rename" | "label" => {
            let id = require_existing(&store, args.id)?;
            let label = args
                .label
                .ok_or_else(|| anyhow::anyhow!("--label is required"))?;

            store.set_vertex_label(id, &label)?;
            session.save_store(&store)?;
            session.status(&format!("Vertex {id} labeled {label:?}."));
        }

        "show" => {
            let id = require_existing(&store, args.id)?;
            let point = store
                .vertex(id)
                .ok_or_else(|| anyhow::anyhow!("Vertex {} not found", id))?;

            if session.json {
                return session.print_json(point);
            }
            println!("Vertex {}", point.id);
            println!("  label: {}", point.label);
            println!(
                "  position: ({}, {})",
                session.number(point.x),
                session.number(point.y)
            );
            let incident = store.incident_edges(id);
            println!("  edges ({}):", incident.len());
            for c in incident {
                println!(
                    "    {} : {} -> {} [{}]",
                    c.id,
                    c.from,
                    c.to,
                    session.number(c.weight)
                );
            }
        }

        "list" | "ls" => {
            if session.json {
                return session.print_json(&store.vertices().collect::<Vec<_>>());
            }
            if store.is_empty() {
                println!("No vertices defined. Use 'mapgraph vertex add' to draw one.");
                return Ok(());
            }

            println!("Vertices ({}):", store.vertex_count());
            for p in store.vertices() {
                println!(
                    "  {} {:?} ({}, {})",
                    p.id,
                    p.label,
                    session.number(p.x),
                    session.number(p.y)
                );
            }
        }

        other => {
            anyhow::bail!(
                "Unknown action: {}. Valid: add, remove, move, rename, show, list",
                other
            );
        }
    }

    Ok(())
}

fn require_position(args: &VertexArgs) -> Result<(f64, f64)> {
    let x = args.x.ok_or_else(|| anyhow::anyhow!("--x is required"))?;
    let y = args.y.ok_or_else(|| anyhow::anyhow!("--y is required"))?;
    if !x.is_finite() || !y.is_finite() {
        anyhow::bail!("Coordinates must be finite numbers");
    }
    Ok((x, y))
}

fn require_existing(store: &MapStore, id: Option<Id>) -> Result<Id> {
    let id = id.ok_or_else(|| anyhow::anyhow!("Vertex id is required"))?;
    if !store.contains_vertex(id) {
        anyhow::bail!("Vertex {} not found", id);
    }
    Ok(id)
}
