//! Error types for the observer API.
//!
//! [`ObserverError`] converts into an HTTP response with a small JSON body.
//! Nothing here carries internal detail beyond a short message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by observer handlers.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource does not exist yet.
    #[error("not found: {0}")]
    NotFound(String),

    /// A parameter update was malformed or out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::InvalidParams(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
