#![allow(dead_code)]

use atelier::{
    config::AttendanceConfig,
    domain::{AttendanceState, CreateMemberRequest, Member, UndecidedPolicy, Workshop},
    service::ServiceContext,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// In-memory database with migrations applied. One connection, so every
/// query sees the same database.
pub async fn pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub async fn context() -> anyhow::Result<ServiceContext> {
    context_with(UndecidedPolicy::RecordAbsent).await
}

pub async fn context_with(undecided: UndecidedPolicy) -> anyhow::Result<ServiceContext> {
    Ok(ServiceContext::from_pool(pool().await?, AttendanceConfig { undecided }))
}

pub fn workshop(id: &str, date: &str, time: &str) -> Workshop {
    Workshop {
        id: id.to_string(),
        title: format!("Workshop {}", id),
        description: String::new(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        location: "TBD".to_string(),
        points: 10,
        min_level: 1,
        attendance_taken: false,
        attendance_state: None,
        created_at: Utc::now(),
    }
}

pub async fn add_workshop(ctx: &ServiceContext, workshop: Workshop) -> anyhow::Result<Workshop> {
    Ok(ctx.workshop_repo.create(workshop).await?)
}

/// Creates a member with a fixed id, registered for the given workshops.
pub async fn add_member(
    ctx: &ServiceContext,
    id: &str,
    workshop_ids: &[&str],
) -> anyhow::Result<Member> {
    ctx.member_repo.create(CreateMemberRequest {
        id: Some(id.to_string()),
        name: format!("Member {}", id),
    }).await?;

    for workshop_id in workshop_ids {
        ctx.member_repo.register(id, workshop_id).await?;
    }

    Ok(ctx.member_repo.find_by_id(id).await?.unwrap())
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

pub fn state(entries: &[(&str, bool)]) -> AttendanceState {
    entries.iter().map(|(id, present)| (id.to_string(), *present)).collect()
}
