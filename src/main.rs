//! Roadgraph CLI entry point

use clap::{Parser, Subcommand};
use roadgraph_core::RoadPolicy;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "roadgraph")]
#[command(about = "Road network graph with shortest-path queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./roadgraph.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, env = "ROADGRAPH_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "ROADGRAPH_PORT")]
        port: Option<u16>,

        /// Road traversal policy: directed or symmetric
        #[arg(long, env = "ROADGRAPH_POLICY")]
        policy: Option<RoadPolicy>,

        /// Adjacency JSON file to start from
        #[arg(long, env = "ROADGRAPH_SEED")]
        seed: Option<PathBuf>,

        /// Time budget for one path search, in milliseconds
        #[arg(long, env = "ROADGRAPH_PATH_TIMEOUT_MS")]
        path_timeout_ms: Option<u64>,
    },
    /// Find a route in an adjacency JSON file and exit
    Route {
        /// Adjacency JSON file
        #[arg(short, long)]
        graph: PathBuf,

        /// Start city
        #[arg(long)]
        from: String,

        /// Destination city
        #[arg(long)]
        to: String,

        /// Algorithm: dijkstra, bfs or dfs
        #[arg(short, long, default_value = "dijkstra")]
        algo: String,

        /// Road traversal policy: directed or symmetric
        #[arg(long, default_value = "symmetric")]
        policy: RoadPolicy,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads ROADGRAPH_* variables
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roadgraph={log_level},roadgraph_core={log_level},roadgraph_server={log_level},tower_http={log_level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Roadgraph v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            policy,
            seed,
            path_timeout_ms,
        } => {
            let file = config::FileSettings::load(cli.config.as_deref())?;
            let overrides = config::Overrides {
                host,
                port,
                policy,
                path_timeout_ms,
                seed,
            };
            commands::serve(config::Settings::resolve(file, overrides)).await
        }
        Commands::Route {
            graph,
            from,
            to,
            algo,
            policy,
        } => {
            let route = commands::route(&graph, policy, &from, &to, &algo)?;
            println!("{}", commands::format_route(&route, &from, &to));
            Ok(())
        }
        Commands::Version => {
            println!("Roadgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
