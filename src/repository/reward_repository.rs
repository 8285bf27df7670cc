use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateRewardRequest, Reward},
    error::{AppError, Result},
    repository::RewardRepository,
};

#[derive(FromRow)]
struct RewardRow {
    id: String,
    title: String,
    description: String,
    cost: i64,
    created_at: NaiveDateTime,
}

pub struct SqliteRewardRepository {
    pool: SqlitePool,
}

impl SqliteRewardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_reward(row: RewardRow) -> Result<Reward> {
        Ok(Reward {
            id: row.id,
            title: row.title,
            description: row.description,
            cost: u32::try_from(row.cost)
                .map_err(|_| AppError::Database(format!("Invalid reward cost: {}", row.cost)))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl RewardRepository for SqliteRewardRepository {
    async fn create(&self, request: CreateRewardRequest) -> Result<Reward> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO rewards (id, title, description, cost, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(request.description.as_deref().unwrap_or_default())
        .bind(i64::from(request.cost))
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Reward {
            id,
            title: request.title,
            description: request.description.unwrap_or_default(),
            cost: request.cost,
            created_at: now,
        })
    }

    async fn list(&self) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(
            "SELECT id, title, description, cost, created_at FROM rewards ORDER BY rowid"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_reward)
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rewards")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
