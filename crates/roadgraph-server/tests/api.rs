//! HTTP contract tests for the roadgraph server.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use roadgraph_core::{GraphStore, RoadPolicy};
use roadgraph_server::{create_router, ServerState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(policy: RoadPolicy) -> Router {
    create_router(Arc::new(ServerState::new(GraphStore::new(policy))))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn seed_abc(app: &Router) {
    for city in ["A", "B", "C"] {
        let (status, _) = post(app, "/add_city", json!({ "name": city })).await;
        assert_eq!(status, StatusCode::OK);
    }
    for (from, to, weight) in [("A", "B", 5), ("B", "C", 2), ("A", "C", 10)] {
        let (status, _) = post(app, "/add_road", json!({ "from": from, "to": to, "weight": weight })).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_add_city_then_duplicate() {
    let app = app(RoadPolicy::Symmetric);

    let (status, body) = post(&app, "/add_city", json!({ "name": "X" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = post(&app, "/add_city", json!({ "name": "X" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "city 'X' already exists");

    let (_, cities) = get(&app, "/all_cities").await;
    assert_eq!(cities, json!(["X"]));
}

#[tokio::test]
async fn test_blank_and_missing_names_rejected() {
    let app = app(RoadPolicy::Symmetric);

    let (status, body) = post(&app, "/add_city", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = post(&app, "/add_city", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_gets_failure_shape() {
    let app = app(RoadPolicy::Symmetric);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/add_city")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_names_are_trimmed() {
    let app = app(RoadPolicy::Symmetric);
    post(&app, "/add_city", json!({ "name": "  Lisbon " })).await;
    let (_, cities) = get(&app, "/all_cities").await;
    assert_eq!(cities, json!(["Lisbon"]));
}

#[tokio::test]
async fn test_find_path_weighted_scenario() {
    let app = app(RoadPolicy::Directed);
    seed_abc(&app).await;

    let (status, body) = post(&app, "/find_path", json!({ "start": "A", "end": "C", "algo": "Dijkstra" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "path": ["A", "B", "C"], "distance": 7 }));

    let (_, body) = post(&app, "/find_path", json!({ "start": "A", "end": "C", "algo": "bfs" })).await;
    assert_eq!(body, json!({ "path": ["A", "C"], "distance": 1 }));

    // algo defaults to dijkstra
    let (_, body) = post(&app, "/find_path", json!({ "start": "A", "end": "C" })).await;
    assert_eq!(body["distance"], 7);
}

#[tokio::test]
async fn test_find_path_no_route_and_errors() {
    let app = app(RoadPolicy::Directed);
    seed_abc(&app).await;

    let (status, body) = post(&app, "/find_path", json!({ "start": "C", "end": "A" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "path": [], "distance": null }));

    let (status, body) = post(&app, "/find_path", json!({ "start": "A", "end": "Q" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "city 'Q' not found");

    let (status, body) = post(&app, "/find_path", json!({ "start": "A", "end": "C", "algo": "teleport" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unknown algorithm 'teleport'");
}

#[tokio::test]
async fn test_road_errors() {
    let app = app(RoadPolicy::Symmetric);
    seed_abc(&app).await;

    let cases = [
        (json!({ "from": "A", "to": "Z", "weight": 3 }), StatusCode::NOT_FOUND),
        (json!({ "from": "A", "to": "B", "weight": 0 }), StatusCode::BAD_REQUEST),
        (json!({ "from": "A", "to": "A", "weight": 2 }), StatusCode::BAD_REQUEST),
        (json!({ "from": "B", "to": "A", "weight": 2 }), StatusCode::CONFLICT),
        (json!({ "from": "A", "to": "B", "weight": "heavy" }), StatusCode::BAD_REQUEST),
    ];
    for (body, expected) in cases {
        let (status, reply) = post(&app, "/add_road", body.clone()).await;
        assert_eq!(status, expected, "{body}");
        assert_eq!(reply["success"], false);
    }

    let (status, _) = post(&app, "/delete_road", json!({ "from": "A", "to": "Z" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_city_cascades_in_exports() {
    let app = app(RoadPolicy::Directed);
    seed_abc(&app).await;

    let (status, body) = post(&app, "/delete_city", json!({ "name": "B" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, graph) = get(&app, "/get_graph?format=edges").await;
    assert_eq!(graph["nodes"], json!(["A", "C"]));
    assert_eq!(graph["edges"], json!([{ "source": "A", "target": "C", "weight": 10 }]));

    let (status, _) = post(&app, "/delete_city", json!({ "name": "B" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_graph_adjacency_default() {
    let app = app(RoadPolicy::Symmetric);
    seed_abc(&app).await;

    let (status, graph) = get(&app, "/get_graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graph["A"], json!([["B", 5], ["C", 10]]));
    assert_eq!(graph["C"], json!([["B", 2], ["A", 10]]));

    let (status, _) = get(&app, "/get_graph?format=svg").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_counts() {
    let app = app(RoadPolicy::Symmetric);
    seed_abc(&app).await;

    let (status, health) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["policy"], "symmetric");
    assert_eq!(health["cities"], 3);
    assert_eq!(health["roads"], 3);
    assert_eq!(health["graph_version"], 6);
}
