use serde::{Deserialize, Serialize};

use crate::models::UserAccount;

// -- Identity --

/// Fields default to empty so that an absent field and an empty field both
/// fail validation the same way, before any store access happens.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password_hash: String,
}

/// `username` doubles as a phone number on login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password_hash: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    pub message: String,
}

impl ConfirmationResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserAccount,
}
