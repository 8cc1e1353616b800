pub mod error;
pub mod identity;
pub mod reports;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};

use roadwatch_store::{ReportStore, UserStore};

use crate::identity::IdentityService;

pub type AppState<S> = Arc<AppStateInner<S>>;

pub struct AppStateInner<S> {
    pub identity: IdentityService<S>,
    pub store: S,
}

impl<S: UserStore + Clone> AppStateInner<S> {
    pub fn new(store: S) -> Self {
        Self {
            identity: IdentityService::new(store.clone()),
            store,
        }
    }
}

/// The full HTTP surface. CORS and trace layers are applied by the binary.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: UserStore + ReportStore + 'static,
{
    Router::new()
        .route("/register", post(identity::register::<S>))
        .route("/login", post(identity::login::<S>))
        .route("/reports", get(reports::list_reports::<S>))
        .route("/cleanup", delete(reports::cleanup::<S>))
        .with_state(state)
}
