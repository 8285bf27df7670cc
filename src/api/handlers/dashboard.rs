use axum::{extract::State, Json};
use chrono::Local;

use crate::{
    api::state::AppState,
    error::Result,
    service::dashboard_service::Dashboard,
};

/// Counts plus the workshops in session at the server's local time.
pub async fn show(State(state): State<AppState>) -> Result<Json<Dashboard>> {
    let now = Local::now().naive_local();
    let dashboard = state.service_context.dashboard_service
        .load(now)
        .await?;

    Ok(Json(dashboard))
}
