use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod attendance_repository;
pub mod member_repository;
pub mod reward_repository;
pub mod workshop_repository;

pub use attendance_repository::SqliteAttendanceRepository;
pub use member_repository::SqliteMemberRepository;
pub use reward_repository::SqliteRewardRepository;
pub use workshop_repository::SqliteWorkshopRepository;

/// Workshops in insertion order. Attendance fields change only through
/// [`AttendanceRepository::commit`].
#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    async fn create(&self, workshop: Workshop) -> Result<Workshop>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Workshop>>;
    async fn list(&self) -> Result<Vec<Workshop>>;
    async fn count(&self) -> Result<i64>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: CreateMemberRequest) -> Result<Member>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>>;
    async fn count(&self) -> Result<i64>;
    async fn register(&self, member_id: &str, workshop_id: &str) -> Result<()>;
    /// Members whose `workshops_attended` contains the workshop, in
    /// registration order. Only id and name are loaded.
    async fn list_registered(&self, workshop_id: &str) -> Result<Vec<RosterMember>>;
    async fn activities(&self, member_id: &str) -> Result<Vec<Activity>>;
}

#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn create(&self, reward: CreateRewardRequest) -> Result<Reward>;
    async fn list(&self) -> Result<Vec<Reward>>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Appends one audit entry per registered member and stores the
    /// workshop's attendance state, all or nothing.
    async fn commit(&self, commit: AttendanceCommit) -> Result<CommitReport>;
}
