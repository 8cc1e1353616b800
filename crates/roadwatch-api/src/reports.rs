use axum::Json;
use axum::extract::State;

use roadwatch_store::{ReportStore, UserStore};
use roadwatch_types::api::ConfirmationResponse;
use roadwatch_types::models::TrafficReport;

use crate::AppState;
use crate::error::ApiError;

/// Pass-through list, newest first. Ordering happens in the store.
pub async fn list_reports<S: UserStore + ReportStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<TrafficReport>>, ApiError> {
    let reports = state.store.list_reports().await?;
    Ok(Json(reports))
}

/// Pass-through to the store's retention procedure.
pub async fn cleanup<S: UserStore + ReportStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<ConfirmationResponse>, ApiError> {
    state.store.purge_old_reports().await?;
    Ok(Json(ConfirmationResponse::new("Old reports deleted")))
}
