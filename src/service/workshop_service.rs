use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{CreateWorkshopRequest, Workshop},
    error::{AppError, Result},
    repository::WorkshopRepository,
};

pub struct WorkshopService {
    repo: Arc<dyn WorkshopRepository>,
}

impl WorkshopService {
    pub fn new(repo: Arc<dyn WorkshopRepository>) -> Self {
        Self { repo }
    }

    /// Create a workshop from the admin form. The id is the creation
    /// timestamp in milliseconds.
    pub async fn create(&self, request: CreateWorkshopRequest) -> Result<Workshop> {
        let now = Utc::now();
        let workshop = request.into_workshop(now.timestamp_millis().to_string(), now)?;

        let created = self.repo.create(workshop).await?;
        tracing::info!("Created workshop {} ({})", created.title, created.id);
        Ok(created)
    }

    /// Get a workshop by ID
    pub async fn get(&self, id: &str) -> Result<Workshop> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Workshop not found".to_string())
        })
    }

    /// Delete a workshop. Irreversible, so the caller must confirm. Member
    /// registrations and activity logs are left as they are.
    pub async fn delete(&self, id: &str, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(AppError::BadRequest(
                "Workshop deletion must be confirmed".to_string()
            ));
        }

        self.repo.delete(id).await?;
        tracing::info!("Deleted workshop {}", id);
        Ok(())
    }
}
