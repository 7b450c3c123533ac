//! Error types for the Accessibilify server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::vision::VisionError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::AnalysisNotFound(id) => (
                StatusCode::NOT_FOUND,
                "ANALYSIS_NOT_FOUND",
                format!("Analysis '{}' not found", id),
            ),
            ServerError::Vision(VisionError::InvalidImage(msg)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                format!("Invalid frame data: {}", msg),
            ),
            ServerError::Vision(err) => {
                tracing::error!("Vision service error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "VISION_SERVICE_ERROR",
                    "Failed to detect labels".to_string(),
                )
            }
            ServerError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage operation failed".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
