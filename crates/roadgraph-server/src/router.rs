//! Axum router setup for the roadgraph server

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        add_city, add_road, all_cities, delete_city, delete_road, find_path, get_graph,
        health_check,
    },
    websocket::ws_handler,
    ServerState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // WebSocket endpoint for change notifications
        .route("/ws", get(ws_handler))
        // Mutations
        .route("/add_city", post(add_city))
        .route("/delete_city", post(delete_city))
        .route("/add_road", post(add_road))
        .route("/delete_road", post(delete_road))
        // Queries
        .route("/find_path", post(find_path))
        .route("/all_cities", get(all_cities))
        .route("/get_graph", get(get_graph))
        .route("/api/health", get(health_check))
        // The UI is served from elsewhere
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
