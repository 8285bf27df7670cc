use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ATTENDANCE_MARKED: &str = "attendance_marked";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// Workshop ids the member is registered for, in registration order.
    pub workshops_attended: Vec<String>,
    /// Append-only audit log, oldest first.
    pub activities: Vec<Activity>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn is_registered_for(&self, workshop_id: &str) -> bool {
        self.workshops_attended.iter().any(|id| id == workshop_id)
    }
}

/// A registered member as the attendance roster sees them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterMember {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub workshop_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    /// Caller-chosen id; a uuid is generated when absent.
    pub id: Option<String>,
    pub name: String,
}
