//! Error types for cooked-server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthError;
use crate::session::status::duration_millis;
use crate::spotify::AggregateError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No Spotify login held (400)
    #[error("Not authenticated with Spotify")]
    NotAuthenticated,

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Roast cooldown still running (429)
    #[error("Roast cooldown active for {remaining:?}")]
    RateLimited { remaining: Duration },

    /// Spotify or token endpoint failure (500)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        match e {
            AggregateError::NotAuthenticated => ApiError::NotAuthenticated,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            // The web client reads `error` as a display string and the
            // remaining time in milliseconds
            ApiError::RateLimited { remaining } => {
                let seconds = remaining.as_millis().div_ceil(1000);
                let body = Json(json!({
                    "error": format!("You are roasting too fast! Chill for {} seconds.", seconds),
                    "cooldownRemaining": duration_millis(remaining),
                }));
                return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            }
            ApiError::NotAuthenticated => (
                StatusCode::BAD_REQUEST,
                "NOT_AUTHENTICATED",
                "Not authenticated with Spotify".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
