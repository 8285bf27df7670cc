use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{format_time_of_day, parse_time_of_day, AttendanceState, Workshop},
    error::{AppError, Result},
    repository::WorkshopRepository,
};

#[derive(FromRow)]
struct WorkshopRow {
    id: String,
    title: String,
    description: String,
    date: NaiveDate,
    time: String,
    location: String,
    points: i64,
    min_level: i64,
    attendance_taken: i32,
    attendance_state: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteWorkshopRepository {
    pool: SqlitePool,
}

impl SqliteWorkshopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_workshop(row: WorkshopRow) -> Result<Workshop> {
        let time = parse_time_of_day(&row.time).map_err(|_| {
            AppError::Database(format!("Invalid time {:?} for workshop {}", row.time, row.id))
        })?;

        let attendance_state = row
            .attendance_state
            .as_deref()
            .map(|json| serde_json::from_str::<AttendanceState>(json))
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Workshop {
            time,
            attendance_state,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            points: u32::try_from(row.points)
                .map_err(|_| AppError::Database(format!("Invalid points: {}", row.points)))?,
            min_level: u8::try_from(row.min_level)
                .map_err(|_| AppError::Database(format!("Invalid min level: {}", row.min_level)))?,
            attendance_taken: row.attendance_taken != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            id: row.id,
        })
    }
}

#[async_trait]
impl WorkshopRepository for SqliteWorkshopRepository {
    async fn create(&self, workshop: Workshop) -> Result<Workshop> {
        let time_str = format_time_of_day(&workshop.time);
        let attendance_state_json = workshop
            .attendance_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let attendance_taken_int = if workshop.attendance_taken { 1i32 } else { 0i32 };

        sqlx::query(
            r#"
            INSERT INTO workshops (
                id, title, description, date, time, location, points,
                min_level, attendance_taken, attendance_state, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&workshop.id)
        .bind(&workshop.title)
        .bind(&workshop.description)
        .bind(workshop.date)
        .bind(&time_str)
        .bind(&workshop.location)
        .bind(i64::from(workshop.points))
        .bind(i64::from(workshop.min_level))
        .bind(attendance_taken_int)
        .bind(&attendance_state_json)
        .bind(workshop.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Workshop {} already exists", workshop.id))
            }
            e => AppError::Database(e.to_string()),
        })?;

        self.find_by_id(&workshop.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created workshop".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Workshop>> {
        let row = sqlx::query_as::<_, WorkshopRow>(
            r#"
            SELECT id, title, description, date, time, location, points,
                   min_level, attendance_taken, attendance_state, created_at
            FROM workshops
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_workshop(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Workshop>> {
        let rows = sqlx::query_as::<_, WorkshopRow>(
            r#"
            SELECT id, title, description, date, time, location, points,
                   min_level, attendance_taken, attendance_state, created_at
            FROM workshops
            ORDER BY rowid
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_workshop)
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workshops")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM workshops WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Workshop not found".to_string()));
        }

        Ok(())
    }
}
