// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Mapgraph CLI - build, query and persist weighted point maps

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::edge::EdgeArgs;
use commands::vertex::VertexArgs;
use commands::Session;

#[derive(Parser)]
#[command(name = "mapgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "MAPGRAPH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Map directory (holds vertices.json and edges.json)
    #[arg(short, long, env = "MAPGRAPH_MAP_DIR", global = true)]
    map: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty map in the map directory
    Init {
        /// Replace an existing map
        #[arg(long)]
        force: bool,
    },

    /// Manage points
    Vertex {
        /// Action: add, remove, move, rename, show, list
        action: String,

        /// Point id
        id: Option<u32>,

        /// Horizontal coordinate
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,

        /// Vertical coordinate
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,

        /// Point label
        #[arg(long)]
        label: Option<String>,
    },

    /// Manage connections
    Edge {
        /// Action: add, remove, reweigh, list
        action: String,

        /// Connection id
        id: Option<u32>,

        /// Source point id
        #[arg(long)]
        from: Option<u32>,

        /// Target point id
        #[arg(long)]
        to: Option<u32>,

        /// Weight for add or reweigh (defaults to the distance between the points)
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Search points by label or connections by weight
    Search {
        /// What to search: label, weight
        by: String,

        /// Label text or weight (matched to two decimals)
        value: String,
    },

    /// Shortest path between two points
    Path {
        /// Start point id
        from: u32,

        /// End point id
        to: u32,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (omit to show everything)
        key: Option<String>,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(mapgraph::config::default_path);
    let config = mapgraph::config::load(&config_path)?;

    // Initialize logging
    let directive = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => config.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let session = Session {
        map_dir: cli.map.clone().unwrap_or_else(|| config.map_dir.clone()),
        json: cli.json,
        color: !cli.no_color && !cli.json,
        precision: config.precision,
    };

    // Execute command
    match cli.command {
        Commands::Init { force } => commands::init::run(&session, force),
        Commands::Vertex { action, id, x, y, label } => {
            commands::vertex::run(&session, &action, VertexArgs { id, x, y, label })
        }
        Commands::Edge { action, id, from, to, weight } => {
            commands::edge::run(&session, &action, EdgeArgs { id, from, to, weight })
        }
        Commands::Search { by, value } => commands::search::run(&session, &by, &value),
        Commands::Path { from, to } => commands::path::run(&session, from, to),
        Commands::Config { key, value } => {
            commands::config::run(&config_path, &config, key, value)
        }
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    }
}
