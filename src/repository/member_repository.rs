use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Activity, CreateMemberRequest, Member, RosterMember},
    error::{AppError, Result},
    repository::MemberRepository,
};

#[derive(FromRow)]
struct MemberRow {
    id: String,
    name: String,
    created_at: NaiveDateTime,
}

#[derive(FromRow)]
struct RosterRow {
    id: String,
    name: String,
}

#[derive(FromRow)]
struct ActivityRow {
    id: String,
    activity_type: String,
    description: String,
    occurred_at: NaiveDateTime,
    workshop_id: Option<String>,
}

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_activity(row: ActivityRow) -> Activity {
        Activity {
            id: row.id,
            activity_type: row.activity_type,
            description: row.description,
            date: DateTime::from_naive_utc_and_offset(row.occurred_at, Utc),
            workshop_id: row.workshop_id,
        }
    }

    async fn registrations(&self, member_id: &str) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT workshop_id FROM member_workshops WHERE member_id = ? ORDER BY rowid"
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Loads registrations and the activity log for a member row.
    async fn hydrate(&self, row: MemberRow) -> Result<Member> {
        let workshops_attended = self.registrations(&row.id).await?;
        let activities = self.activities(&row.id).await?;

        Ok(Member {
            id: row.id,
            name: row.name,
            workshops_attended,
            activities,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn create(&self, request: CreateMemberRequest) -> Result<Member> {
        let id = request.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now_naive = Utc::now().naive_utc();

        sqlx::query("INSERT INTO members (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&request.name)
            .bind(now_naive)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict(format!("Member {} already exists", id))
                }
                e => AppError::Database(e.to_string()),
            })?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created member".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, created_at FROM members WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None)
        }
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn register(&self, member_id: &str, workshop_id: &str) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE id = ?)"
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if !exists {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO member_workshops (member_id, workshop_id, registered_at)
            VALUES (?, ?, ?)
            ON CONFLICT (member_id, workshop_id) DO NOTHING
            "#
        )
        .bind(member_id)
        .bind(workshop_id)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_registered(&self, workshop_id: &str) -> Result<Vec<RosterMember>> {
        let rows = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT m.id, m.name
            FROM members m
            JOIN member_workshops mw ON mw.member_id = m.id
            WHERE mw.workshop_id = ?
            ORDER BY mw.rowid
            "#
        )
        .bind(workshop_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| RosterMember { id: row.id, name: row.name })
            .collect())
    }

    async fn activities(&self, member_id: &str) -> Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, activity_type, description, occurred_at, workshop_id
            FROM member_activities
            WHERE member_id = ?
            ORDER BY rowid
            "#
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::row_to_activity).collect())
    }
}
