use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a usable response (connect, TLS, timeout).
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status. `message` carries the
    /// store's own error message verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The store answered 2xx but the body did not match the expected rows.
    #[error("store returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Build an `Api` error from a PostgREST-style error body, falling back
    /// to the raw body when it is not the usual `{"message": ...}` shape.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| body.trim().to_string());
        StoreError::Api { status, message }
    }
}
