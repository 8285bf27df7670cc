use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{CreateWorkshopRequest, Workshop},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    workshops: Vec<Workshop>,
    total: usize,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let workshops = state.service_context.session_selector
        .browsable()
        .await?;

    let total = workshops.len();
    Ok(Json(ListResponse { workshops, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workshop>> {
    let workshop = state.service_context.workshop_service
        .get(&id)
        .await?;

    Ok(Json(workshop))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<Workshop>)> {
    let workshop = state.service_context.workshop_service
        .create(request)
        .await?;

    Ok((StatusCode::CREATED, Json(workshop)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode> {
    state.service_context.workshop_service
        .delete(&id, params.confirm)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
