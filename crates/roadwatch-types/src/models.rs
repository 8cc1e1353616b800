//! Store row types. These map directly to rows in the remote store, kept
//! distinct from the request/response types in `api` so the wire surface can
//! evolve without touching persistence.

use serde::{Deserialize, Serialize};

/// An account row as the store returns it. `id` is store-assigned and never
/// set by this service; `password_hash` is an opaque value hashed upstream —
/// it is only ever compared for exact equality, never derived here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Insert shape for `users`. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserAccount {
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// A known chat subscriber. One row per `chat_id`; display fields are frozen
/// at first contact and never refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSubscriber {
    pub id: i64,
    pub chat_id: i64,
    pub username: String,
    pub first_name: String,
}

/// Insert shape for `telegram_users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTelegramSubscriber {
    pub chat_id: i64,
    pub username: String,
    pub first_name: String,
}

/// Insert shape for `telegram_raw_messages`. Append-only; duplicates are
/// allowed, every qualifying group message is archived verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct NewRawMessageRecord {
    pub message: String,
    pub source: String,
}

impl NewRawMessageRecord {
    pub fn telegram(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: "telegram".to_string(),
        }
    }
}

/// A traffic report row. The report schema is owned by the store; only the
/// columns this service sorts on are typed, the rest pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficReport {
    pub id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
