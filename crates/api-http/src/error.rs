//! HTTP Error Types
//!
//! Maps gateway and serialization failures to HTTP responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use scout_core::port::GatewayError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Adapter answered with a non-success status; relayed as-is
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// Adapter could not be reached
    #[error("bad gateway: {0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Status { status, body, .. } => ApiError::Upstream { status, body },
            unreachable @ GatewayError::Unreachable { .. } => {
                ApiError::BadGateway(unreachable.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let content_type = [(header::CONTENT_TYPE, "text/plain; charset=utf-8")];
                (status, content_type, body).into_response()
            }
            ApiError::BadGateway(message) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message })))
                    .into_response()
            }
        }
    }
}
