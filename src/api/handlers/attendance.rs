use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{CommitMode, CommitReport, Mark, Workshop},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct RosterEntry {
    id: String,
    name: String,
    mark: Mark,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    workshop: Workshop,
    members: Vec<RosterEntry>,
}

/// Registered members with the marks persisted so far.
pub async fn roster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RosterResponse>> {
    let ctx = &state.service_context;
    let workshop = ctx.workshop_service.get(&id).await?;

    let mut editor = ctx.attendance_editor(CommitMode::Amend);
    editor.open(workshop.clone()).await?;

    let members = editor
        .marks()
        .into_iter()
        .map(|(member, mark)| RosterEntry {
            id: member.id.clone(),
            name: member.name.clone(),
            mark,
        })
        .collect();

    Ok(Json(RosterResponse { workshop, members }))
}

#[derive(Debug, Deserialize)]
pub struct ToggleDto {
    member_id: String,
    present: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommitAttendanceDto {
    #[serde(default)]
    toggles: Vec<ToggleDto>,
    /// Dashboard commits also mark the workshop's attendance as taken.
    #[serde(default)]
    finalize: bool,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    message: String,
    report: CommitReport,
}

/// Applies toggles over the persisted state and commits the result.
pub async fn commit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<CommitAttendanceDto>,
) -> Result<Json<CommitResponse>> {
    let ctx = &state.service_context;
    let workshop = ctx.workshop_service.get(&id).await?;

    let mode = if dto.finalize { CommitMode::Finalize } else { CommitMode::Amend };
    let mut editor = ctx.attendance_editor(mode);
    editor.open(workshop).await?;

    for toggle in &dto.toggles {
        editor.toggle(&toggle.member_id, toggle.present)?;
    }

    let report = editor.commit().await?.ok_or_else(|| {
        AppError::Internal("Attendance editor closed before commit".to_string())
    })?;

    Ok(Json(CommitResponse {
        message: report.confirmation(),
        report,
    }))
}
