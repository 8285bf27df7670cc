use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    domain::{AttendanceCommit, CommitMode, CommitReport, ATTENDANCE_MARKED},
    error::{AppError, Result},
    repository::AttendanceRepository,
};

pub struct SqliteAttendanceRepository {
    pool: SqlitePool,
}

impl SqliteAttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for SqliteAttendanceRepository {
    async fn commit(&self, commit: AttendanceCommit) -> Result<CommitReport> {
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let already_taken = sqlx::query_scalar::<_, i32>(
            "SELECT attendance_taken FROM workshops WHERE id = ?"
        )
        .bind(&commit.workshop_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Workshop not found".to_string()))?;

        // Re-read the roster inside the transaction so the state only ever
        // names members registered at write time.
        let registered = sqlx::query_scalar::<_, String>(
            "SELECT member_id FROM member_workshops WHERE workshop_id = ? ORDER BY rowid"
        )
        .bind(&commit.workshop_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let resolved = commit.resolve(&registered);
        let marked_at = commit.marked_at.naive_utc();

        for entry in &resolved.entries {
            sqlx::query(
                r#"
                INSERT INTO member_activities (
                    id, member_id, activity_type, description, occurred_at, workshop_id
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&entry.member_id)
            .bind(ATTENDANCE_MARKED)
            .bind(&entry.description)
            .bind(marked_at)
            .bind(&commit.workshop_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let state_json = serde_json::to_string(&resolved.state)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let attendance_taken = already_taken != 0 || commit.mode == CommitMode::Finalize;

        sqlx::query(
            "UPDATE workshops SET attendance_state = ?, attendance_taken = ? WHERE id = ?"
        )
        .bind(&state_json)
        .bind(if attendance_taken { 1i32 } else { 0i32 })
        .bind(&commit.workshop_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            workshop_id = %commit.workshop_id,
            members = registered.len(),
            entries = resolved.entries.len(),
            attendance_taken,
            "Committed attendance"
        );

        Ok(CommitReport {
            workshop_id: commit.workshop_id,
            workshop_title: commit.workshop_title,
            members_processed: registered.len(),
            entries_written: resolved.entries.len(),
            attendance_state: resolved.state,
            attendance_taken,
        })
    }
}
