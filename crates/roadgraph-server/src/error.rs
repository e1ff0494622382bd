//! Mapping of graph errors onto HTTP responses

use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use roadgraph_core::GraphError;
use thiserror::Error;
use tracing::warn;

use crate::handlers::ActionResponse;

/// Anything a handler can fail with. Rendered as `{success: false, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("path search timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Graph(e) => match e {
                GraphError::DuplicateNode(_) | GraphError::DuplicateEdge { .. } => {
                    StatusCode::CONFLICT
                }
                GraphError::NodeNotFound(_) | GraphError::EdgeNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                GraphError::InvalidWeight(_)
                | GraphError::SelfLoop(_)
                | GraphError::UnknownAlgorithm(_)
                | GraphError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                GraphError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), "Request rejected: {}", self);
        (status, Json(ActionResponse::failure(self.to_string()))).into_response()
    }
}
