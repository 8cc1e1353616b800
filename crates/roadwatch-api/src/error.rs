use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use roadwatch_store::StoreError;

/// Client-visible failure kinds. The kind decides the status code; the
/// display string becomes the `message` field of the JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was absent or empty. Never reaches the store.
    #[error("Missing fields")]
    MissingFields,

    /// Register found an account with the same username or phone number.
    #[error("User already exists")]
    Conflict,

    /// Login matched zero rows.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Any failure reported by the store, message carried verbatim.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(err) = &self {
            error!("store failure: {err:?}");
        }
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
