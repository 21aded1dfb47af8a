//! Error types for the cache service
//!
//! Two distinct taxonomies: `CacheError` covers failures inside the cache
//! layer and is always recovered locally (reads downgrade to a miss, writes
//! and deletes are logged and dropped), while `ApiError` is what handlers
//! return over HTTP when the authoritative catalog itself fails.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures internal to the cache layer.
///
/// None of these variants ever cross the HTTP boundary.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing key-value store unreachable or refused the operation
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// Backing key-value store did not answer within the operation timeout
    #[error("cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Cached payload could not be encoded or decoded
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Api Error Enum ==
/// Request-level failures surfaced to HTTP callers.
///
/// Produced only by the catalog collaborator paths; the cache layer never
/// contributes a variant here.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested entity does not exist in the catalog
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
