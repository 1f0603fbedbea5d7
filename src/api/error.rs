//! API error mapping
//!
//! Engine errors cross the wire as a distinguishable kind plus a
//! human-readable message, in a `{"error": {"kind", "message"}}` envelope.
//! Empty undo/redo history is the one exception: it is a benign user-facing
//! condition and answers 200 with an `"empty"` status instead of an error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Malformed request field caught at the boundary (bad date or time string)
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn kind_and_status(&self) -> (&'static str, StatusCode) {
        match self {
            ApiError::BadRequest(_) | ApiError::Engine(EngineError::Validation(_)) => {
                ("validation", StatusCode::BAD_REQUEST)
            }
            ApiError::Engine(EngineError::Conflict(_)) => ("conflict", StatusCode::CONFLICT),
            ApiError::Engine(EngineError::Cycle(_)) => ("cycle", StatusCode::BAD_REQUEST),
            ApiError::Engine(EngineError::NotFound(_)) => ("not_found", StatusCode::NOT_FOUND),
            ApiError::Engine(EngineError::EmptyHistory(_)) => {
                ("empty_history", StatusCode::OK)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Engine(EngineError::EmptyHistory(message)) = &self {
            let body = Json(json!({ "status": "empty", "message": *message }));
            return (StatusCode::OK, body).into_response();
        }

        let (kind, status) = self.kind_and_status();
        let body = Json(json!({
            "error": {
                "kind": kind,
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
