use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};

use crate::{
    domain::Workshop,
    error::Result,
    repository::WorkshopRepository,
};

/// A workshop is in session when it is scheduled for `now`'s date and hour
/// and its attendance has not been taken yet.
pub fn is_in_session(workshop: &Workshop, now: NaiveDateTime) -> bool {
    workshop.date == now.date()
        && workshop.time.hour() == now.hour()
        && !workshop.attendance_taken
}

pub struct SessionSelector {
    repo: Arc<dyn WorkshopRepository>,
}

impl SessionSelector {
    pub fn new(repo: Arc<dyn WorkshopRepository>) -> Self {
        Self { repo }
    }

    /// Workshops in session at `now`, in store order.
    pub async fn current(&self, now: NaiveDateTime) -> Result<Vec<Workshop>> {
        let workshops = self.repo.list().await?;
        let current: Vec<Workshop> = workshops
            .into_iter()
            .filter(|w| is_in_session(w, now))
            .collect();

        tracing::debug!("{} workshops in session at {}", current.len(), now);
        Ok(current)
    }

    /// Every workshop, for manual attendance editing.
    pub async fn browsable(&self) -> Result<Vec<Workshop>> {
        self.repo.list().await
    }
}
