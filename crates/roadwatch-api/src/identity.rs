use axum::Json;
use axum::extract::State;
use tracing::debug;

use roadwatch_store::UserStore;
use roadwatch_types::api::{ConfirmationResponse, LoginRequest, LoginResponse, RegisterRequest};
use roadwatch_types::models::{NewUserAccount, UserAccount};

use crate::AppState;
use crate::error::ApiError;

/// Register/login semantics over an injected credential store.
pub struct IdentityService<S> {
    users: S,
}

impl<S: UserStore> IdentityService<S> {
    pub fn new(users: S) -> Self {
        Self { users }
    }

    /// Check-then-insert. The two steps are not atomic from here: two
    /// concurrent registers for the same username can both pass the check,
    /// and the store's unique constraints on `username`/`phone_number` decide
    /// the race — the loser gets an insert error, never a duplicate row.
    pub async fn register(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        if req.username.is_empty() || req.phone_number.is_empty() || req.password_hash.is_empty() {
            return Err(ApiError::MissingFields);
        }

        let existing = self
            .users
            .find_credential_conflicts(&req.username, &req.phone_number)
            .await?;
        if !existing.is_empty() {
            return Err(ApiError::Conflict);
        }

        self.users
            .insert_account(&NewUserAccount {
                username: req.username.clone(),
                phone_number: req.phone_number.clone(),
                password_hash: req.password_hash.clone(),
            })
            .await?;

        Ok(())
    }

    /// Matches on username OR phone number, AND the exact opaque hash. When
    /// the identifier names one account's username and a different account's
    /// phone number, whichever row the store yields first wins — callers must
    /// not assume a specific account in that case.
    pub async fn login(&self, req: &LoginRequest) -> Result<UserAccount, ApiError> {
        if req.username.is_empty() || req.password_hash.is_empty() {
            return Err(ApiError::MissingFields);
        }

        let mut matches = self
            .users
            .find_account(&req.username, &req.password_hash)
            .await?;
        if matches.is_empty() {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(matches.remove(0))
    }
}

pub async fn register<S: UserStore + 'static>(
    State(state): State<AppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ConfirmationResponse>, ApiError> {
    debug!(username = %req.username, "received register request");
    state.identity.register(&req).await?;
    Ok(Json(ConfirmationResponse::new("User registered successfully")))
}

pub async fn login<S: UserStore + 'static>(
    State(state): State<AppState<S>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!(username = %req.username, "received login request");
    let user = state.identity.login(&req).await?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
    }))
}
