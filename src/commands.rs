//! CLI command implementations

use std::path::Path;

use anyhow::Context;
use roadgraph_core::{find_path, Adjacency, Algorithm, Graph, GraphStore, RoadPolicy, Route};
use roadgraph_server::{RoadgraphServer, ServerConfig};

use crate::config::Settings;

pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        "Starting roadgraph server on {}:{} ({} roads)",
        settings.host,
        settings.port,
        settings.policy
    );

    let graph = match &settings.seed {
        Some(path) => load_graph(path, settings.policy)?,
        None => Graph::new(settings.policy),
    };
    tracing::info!("Serving {} cities, {} roads", graph.city_count(), graph.road_count());

    let config = ServerConfig {
        host: settings.host,
        port: settings.port,
        path_timeout: settings.path_timeout,
    };
    let server = RoadgraphServer::new(GraphStore::from_graph(graph), config);
    server.start().await
}

/// Answer one path query against a graph file without starting a server.
pub fn route(
    graph_file: &Path,
    policy: RoadPolicy,
    from: &str,
    to: &str,
    algo: &str,
) -> anyhow::Result<Route> {
    let algorithm: Algorithm = algo.parse()?;
    let graph = load_graph(graph_file, policy)?;
    let route = find_path(&graph, from, to, algorithm)?;
    Ok(route)
}

pub fn format_route(route: &Route, from: &str, to: &str) -> String {
    match route.distance {
        Some(distance) if route.is_found() => {
            format!("Path: {}\nDistance: {}", route.path.join(" → "), distance)
        }
        _ => format!("No route from {from} to {to}"),
    }
}

/// Load an adjacency document (`{ city: [[neighbor, weight], ...] }`).
fn load_graph(path: &Path, policy: RoadPolicy) -> anyhow::Result<Graph> {
    tracing::info!("Loading graph from {}", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read graph file {}", path.display()))?;
    let doc: Adjacency = serde_json::from_str(&text)
        .with_context(|| format!("invalid graph file {}", path.display()))?;
    let graph = Graph::from_adjacency(policy, &doc)
        .with_context(|| format!("cannot build graph from {}", path.display()))?;

    tracing::info!("Loaded {} cities, {} roads", graph.city_count(), graph.road_count());
    Ok(graph)
}
