//! REST API handlers for the roadgraph server

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{IntoResponse, Json, Response},
};
use roadgraph_core::{find_path_with_cancel, Algorithm, CancelToken, GraphError, Route};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, ServerState};

/// Outcome of a mutation, in the shape the UI checks (`data.success`).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResponse {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ActionResponse {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoadRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub weight: Option<WeightInput>,
}

/// Road weights arrive as JSON numbers, or as numeric strings from form inputs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(i64),
    Text(String),
}

impl WeightInput {
    fn value(&self) -> Result<i64, GraphError> {
        match self {
            WeightInput::Number(n) => Ok(*n),
            WeightInput::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| GraphError::InvalidInput(format!("weight '{s}' is not an integer"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub algo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub format: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub policy: String,
    pub cities: usize,
    pub roads: usize,
    pub graph_version: u64,
}

/// Trim a required name field; absent or blank is invalid input.
fn required(value: Option<String>, field: &str) -> Result<String, GraphError> {
    let value = value.unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GraphError::InvalidInput(format!("'{field}' is required")));
    }
    Ok(trimmed.to_string())
}

pub async fn add_city(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CityRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(req) = payload?;
    let name = required(req.name, "name")?;

    let change = state.store.add_city(&name)?;
    Ok(Json(ActionResponse::ok(change.describe())))
}

pub async fn delete_city(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CityRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(req) = payload?;
    let name = required(req.name, "name")?;

    let change = state.store.delete_city(&name)?;
    Ok(Json(ActionResponse::ok(change.describe())))
}

pub async fn add_road(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<RoadRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(req) = payload?;
    let from = required(req.from, "from")?;
    let to = required(req.to, "to")?;
    let weight = match req.weight {
        Some(w) => w.value()?,
        None => 1,
    };

    let change = state.store.add_road(&from, &to, weight)?;
    Ok(Json(ActionResponse::ok(change.describe())))
}

pub async fn delete_road(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<RoadRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(req) = payload?;
    let from = required(req.from, "from")?;
    let to = required(req.to, "to")?;

    let change = state.store.delete_road(&from, &to)?;
    Ok(Json(ActionResponse::ok(change.describe())))
}

/// Run a path query on the blocking pool against a snapshot, bounded by the
/// configured timeout. A timed-out search is cancelled, not left running.
pub async fn find_path(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<PathRequest>, JsonRejection>,
) -> Result<Json<Route>, ApiError> {
    let Json(req) = payload?;
    let start = required(req.start, "start")?;
    let end = required(req.end, "end")?;
    let algorithm: Algorithm = match req.algo.as_deref() {
        Some(name) if !name.trim().is_empty() => name.parse()?,
        _ => Algorithm::default(),
    };
    debug!(%start, %end, %algorithm, "Path query");

    let snapshot = state.store.snapshot();
    let route = run_cancellable(state.path_timeout, CancelToken::new(), move |cancel| {
        find_path_with_cancel(&snapshot, &start, &end, algorithm, cancel)
    })
    .await?;
    Ok(Json(route))
}

/// Run `search` on the blocking pool, giving up after `budget`.
///
/// On timeout `cancel` is set so the search stops at its next check instead
/// of running on in the background.
pub(crate) async fn run_cancellable<T, F>(
    budget: Duration,
    cancel: CancelToken,
    search: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> Result<T, GraphError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || search(&cancel)
    });

    match tokio::time::timeout(budget, task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
        Err(_) => {
            cancel.cancel();
            Err(ApiError::Timeout(budget))
        }
    }
}

/// City names in insertion order.
pub async fn all_cities(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.store.all_city_names())
}

/// Get the current graph as adjacency (default) or edge list.
pub async fn get_graph(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<GraphQuery>,
) -> Result<Response, ApiError> {
    let snapshot = state.store.snapshot();
    match query.format.as_deref().unwrap_or("adjacency") {
        "adjacency" => Ok(Json(snapshot.to_adjacency()).into_response()),
        "edges" | "edge_list" => Ok(Json(snapshot.to_edge_list()).into_response()),
        other => Err(GraphError::InvalidInput(format!("unknown graph format '{other}'")).into()),
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        policy: snapshot.policy().to_string(),
        cities: snapshot.city_count(),
        roads: snapshot.road_count(),
        graph_version: snapshot.version(),
    })
}
