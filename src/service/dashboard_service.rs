use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    domain::{CommitReport, Workshop},
    error::Result,
    repository::{MemberRepository, RewardRepository, WorkshopRepository},
    service::session_selector::SessionSelector,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub member_count: i64,
    pub workshop_count: i64,
    pub reward_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub in_session: Vec<Workshop>,
}

impl Dashboard {
    /// Drops a workshop from the in-session list. Returns whether it was there.
    pub fn retire(&mut self, workshop_id: &str) -> bool {
        let before = self.in_session.len();
        self.in_session.retain(|w| w.id != workshop_id);
        self.in_session.len() != before
    }

    /// Retires the committed workshop once its attendance is taken. The
    /// server keeps no dashboard between requests; a client holding one
    /// applies the `report` returned by the attendance commit endpoint.
    pub fn apply(&mut self, report: &CommitReport) {
        if report.attendance_taken {
            self.retire(&report.workshop_id);
        }
    }
}

pub struct DashboardService {
    member_repo: Arc<dyn MemberRepository>,
    workshop_repo: Arc<dyn WorkshopRepository>,
    reward_repo: Arc<dyn RewardRepository>,
    selector: Arc<SessionSelector>,
}

impl DashboardService {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        workshop_repo: Arc<dyn WorkshopRepository>,
        reward_repo: Arc<dyn RewardRepository>,
        selector: Arc<SessionSelector>,
    ) -> Self {
        Self { member_repo, workshop_repo, reward_repo, selector }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let (member_count, workshop_count, reward_count) = tokio::try_join!(
            self.member_repo.count(),
            self.workshop_repo.count(),
            self.reward_repo.count(),
        )?;

        Ok(DashboardStats { member_count, workshop_count, reward_count })
    }

    pub async fn load(&self, now: NaiveDateTime) -> Result<Dashboard> {
        let stats = self.stats().await?;
        let in_session = self.selector.current(now).await?;
        Ok(Dashboard { stats, in_session })
    }
}
