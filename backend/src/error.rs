//! Error handling for the Will It Rain backend
//!
//! Two layers: [`SourceError`] for prediction-tier failures that are recovered
//! internally by advancing the cascade, and [`AppError`] for failures that
//! surface to HTTP clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single prediction tier. Never surfaced to the caller unless
/// the request itself was invalid; the resolver advances to the next tier.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(Duration::from_secs(0))
        } else if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported sector: {0}")]
    UnsupportedSector(String),

    // External service errors
    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Only reachable if the total deterministic fallback tier itself fails,
    // which indicates an implementation bug.
    #[error("All prediction sources exhausted: {0}")]
    Exhausted(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.to_string(),
                },
            ),
            AppError::UnsupportedSector(sector) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNSUPPORTED_SECTOR".to_string(),
                    message: format!("Sector '{}' is not supported", sector),
                },
            ),
            AppError::GeocodingFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "GEOCODING_FAILED".to_string(),
                    message: format!("Failed to geocode location: {}", msg),
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: format!("External service error: {}", msg),
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                },
            ),
            AppError::Exhausted(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "PREDICTION_UNAVAILABLE".to_string(),
                    message: format!("Weather prediction service unavailable: {}", msg),
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.to_string(),
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
