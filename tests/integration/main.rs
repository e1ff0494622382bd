//! Integration tests for Roadgraph
//!
//! These tests drive the built binary and check that the core store and
//! server state work together.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use roadgraph_core::{find_path, Adjacency, Algorithm, Graph, GraphStore, RoadPolicy};
use roadgraph_server::{RoadgraphServer, ServerConfig};
use tempfile::NamedTempFile;

const ABC: &str = r#"{"A":[["B",5],["C",10]],"B":[["C",2]],"C":[]}"#;

fn graph_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write graph");
    file
}

fn roadgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_roadgraph"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute roadgraph")
}

fn route(file: &Path, extra: &[&str]) -> Output {
    let path = file.to_str().expect("temp path is utf-8");
    let mut args = vec!["route", "--graph", path];
    args.extend_from_slice(extra);
    roadgraph(&args)
}

#[test]
fn test_cli_invocation() {
    let output = roadgraph(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("shortest-path"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("route"));
}

#[test]
fn test_version_command() {
    let output = roadgraph(&["version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_route_command_weighted() {
    let file = graph_file(ABC);
    let output = route(file.path(), &["--from", "A", "--to", "C", "--policy", "directed"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("A → B → C"));
    assert!(stdout.contains("Distance: 7"));
}

#[test]
fn test_route_command_bfs_and_no_route() {
    let file = graph_file(ABC);

    let output = route(file.path(), &["--from", "A", "--to", "C", "--algo", "bfs", "--policy", "directed"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("A → C"));
    assert!(stdout.contains("Distance: 1"));

    let output = route(file.path(), &["--from", "C", "--to", "A", "--policy", "directed"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("No route from C to A"));
}

#[test]
fn test_route_command_symmetric_goes_backwards() {
    let file = graph_file(ABC);
    let output = route(file.path(), &["--from", "C", "--to", "A"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("C → B → A"));
    assert!(stdout.contains("Distance: 7"));
}

#[test]
fn test_route_command_failures() {
    let file = graph_file(ABC);

    let output = route(file.path(), &["--from", "A", "--to", "Q"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("city 'Q' not found"));

    let output = route(file.path(), &["--from", "A", "--to", "C", "--algo", "teleport"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown algorithm"));

    let broken = graph_file(r#"{"A":[["B",0]]}"#);
    let output = route(broken.path(), &["--from", "A", "--to", "B"]);
    assert!(!output.status.success());
}

#[test]
fn test_document_roundtrip_through_store() {
    let doc: Adjacency = serde_json::from_str(ABC).unwrap();
    let graph = Graph::from_adjacency(RoadPolicy::Directed, &doc).unwrap();
    let store = GraphStore::from_graph(graph);

    store.add_city("D").unwrap();
    store.add_road("C", "D", 1).unwrap();

    let snapshot = store.snapshot();
    let route = find_path(&snapshot, "A", "D", Algorithm::Dijkstra).unwrap();
    assert_eq!(route.path, ["A", "B", "C", "D"]);
    assert_eq!(route.distance, Some(8));

    let exported = serde_json::to_string(&snapshot.to_adjacency()).unwrap();
    assert_eq!(exported, r#"{"A":[["B",5],["C",10]],"B":[["C",2]],"C":[["D",1]],"D":[]}"#);
}

#[tokio::test]
async fn test_server_state_shares_store() {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let server = RoadgraphServer::new(GraphStore::new(RoadPolicy::Symmetric), config);
    let state = server.state();

    let mut rx = state.feed.subscribe();
    state.store.add_city("Oslo").unwrap();

    let msg = rx.recv().await.unwrap();
    assert!(msg.contains("city_added"));
    assert_eq!(server.state().store.all_city_names(), ["Oslo"]);
}
