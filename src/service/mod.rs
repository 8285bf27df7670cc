pub mod attendance_editor;
pub mod dashboard_service;
pub mod session_selector;
pub mod workshop_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::config::AttendanceConfig;
use crate::domain::CommitMode;
use crate::repository::*;
use attendance_editor::AttendanceEditor;
use dashboard_service::DashboardService;
use session_selector::SessionSelector;
use workshop_service::WorkshopService;

pub struct ServiceContext {
    pub member_repo: Arc<dyn MemberRepository>,
    pub workshop_repo: Arc<dyn WorkshopRepository>,
    pub reward_repo: Arc<dyn RewardRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub workshop_service: Arc<WorkshopService>,
    pub session_selector: Arc<SessionSelector>,
    pub dashboard_service: Arc<DashboardService>,
    pub attendance_config: AttendanceConfig,
}

impl ServiceContext {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        workshop_repo: Arc<dyn WorkshopRepository>,
        reward_repo: Arc<dyn RewardRepository>,
        attendance_repo: Arc<dyn AttendanceRepository>,
        attendance_config: AttendanceConfig,
    ) -> Self {
        let workshop_service = Arc::new(WorkshopService::new(workshop_repo.clone()));
        let session_selector = Arc::new(SessionSelector::new(workshop_repo.clone()));
        let dashboard_service = Arc::new(DashboardService::new(
            member_repo.clone(),
            workshop_repo.clone(),
            reward_repo.clone(),
            session_selector.clone(),
        ));

        Self {
            member_repo,
            workshop_repo,
            reward_repo,
            attendance_repo,
            workshop_service,
            session_selector,
            dashboard_service,
            attendance_config,
        }
    }

    /// Wires every repository to the same SQLite pool.
    pub fn from_pool(pool: SqlitePool, attendance_config: AttendanceConfig) -> Self {
        Self::new(
            Arc::new(SqliteMemberRepository::new(pool.clone())),
            Arc::new(SqliteWorkshopRepository::new(pool.clone())),
            Arc::new(SqliteRewardRepository::new(pool.clone())),
            Arc::new(SqliteAttendanceRepository::new(pool)),
            attendance_config,
        )
    }

    /// A fresh editor; each request or console session gets its own.
    pub fn attendance_editor(&self, mode: CommitMode) -> AttendanceEditor {
        AttendanceEditor::new(
            self.member_repo.clone(),
            self.attendance_repo.clone(),
            mode,
            self.attendance_config.undecided,
        )
    }
}
