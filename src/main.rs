use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tablegraph::{
    config,
    lineage::{ColumnListingOptions, GraphSnapshot},
    server,
};

/// tablegraph - Table-level lineage over column-level graph snapshots
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve tables over HTTP
    Serve(ServeArgs),
    /// Print every table with its columns and neighbor tables
    Tables {
        /// Snapshot file (JSON, or YAML with a .yaml/.yml extension)
        snapshot: PathBuf,
        /// Only list tables whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one table by node id, whether or not it is classified as a table
    Table {
        snapshot: PathBuf,
        id: String,
    },
    /// Print the column listing of one table
    Columns {
        snapshot: PathBuf,
        id: String,
        /// Only list columns whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Column id to show expanded; repeatable
        #[arg(long = "expand")]
        expanded: Vec<String>,
        /// Prefix for column detail links
        #[arg(long, default_value = "")]
        route_prefix: String,
    },
}

/// Unset flags fall back to `TABLEGRAPH_*` environment variables (and `.env`),
/// then to the built-in defaults.
#[derive(Args)]
struct ServeArgs {
    /// HTTP server host address [default: 0.0.0.0]
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port [default: 8080]
    #[arg(long)]
    http_port: Option<u16>,

    /// Prefix for column detail links, e.g. /acme/prod
    #[arg(long)]
    route_prefix: Option<String>,

    /// Snapshot file loaded at startup
    #[arg(long)]
    snapshot: Option<String>,

    /// Maximum request body size in bytes [default: 67108864]
    #[arg(long)]
    max_body_bytes: Option<usize>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Run server in daemon mode (graceful stop on SIGINT/SIGTERM)
    #[arg(long)]
    daemon: bool,
}

impl From<ServeArgs> for config::CliConfig {
    fn from(args: ServeArgs) -> Self {
        config::CliConfig {
            http_host: args.http_host,
            http_port: args.http_port,
            route_prefix: args.route_prefix,
            snapshot_path: args.snapshot,
            max_body_bytes: args.max_body_bytes,
            request_timeout_secs: args.request_timeout_secs,
            daemon: args.daemon,
        }
    }
}

fn load(path: &Path) -> Result<GraphSnapshot> {
    GraphSnapshot::from_file(path).with_context(|| format!("loading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve(args) => {
            dotenvy::dotenv().ok();
            let cli_config: config::CliConfig = args.into();
            let config = config::ServerConfig::from_env()
                .and_then(|env_config| env_config.with_cli(cli_config))
                .context("Configuration error")?;
            server::run_with_config(config).await;
        }
        Command::Tables { snapshot, search } => {
            let snapshot = load(&snapshot)?;
            print_json(&snapshot.tables_matching(search.as_deref()))?;
        }
        Command::Table { snapshot, id } => {
            let snapshot = load(&snapshot)?;
            let table = snapshot
                .table(&id)
                .with_context(|| format!("node `{}` not found", id))?;
            print_json(&table)?;
        }
        Command::Columns {
            snapshot,
            id,
            search,
            expanded,
            route_prefix,
        } => {
            let snapshot = load(&snapshot)?;
            let expanded: HashSet<String> = expanded.into_iter().collect();
            let options = ColumnListingOptions {
                search: search.as_deref(),
                expanded: &expanded,
                route_prefix: &route_prefix,
            };
            let listing = snapshot
                .column_listing(&id, &options)
                .with_context(|| format!("node `{}` not found", id))?;
            print_json(&listing)?;
        }
    }

    Ok(())
}
