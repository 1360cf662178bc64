use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::{CreateAlertRequest, DeleteResponse, UpdateAlertRequest};
use crate::models::{Alert, AlertFilters};
use crate::repositories::AlertRepository;
use crate::utils::errors::{AppError, AppResult, StoreResultExt};

pub struct AlertController {
    repository: Arc<dyn AlertRepository>,
}

impl AlertController {
    pub fn new(repository: Arc<dyn AlertRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filters: &AlertFilters) -> AppResult<Vec<Alert>> {
        self.repository
            .list(filters)
            .await
            .or_fail("Failed to load alerts")
    }

    pub async fn get(&self, id: i32) -> AppResult<Alert> {
        self.repository
            .find_by_id(id)
            .await
            .or_fail("Failed to load alert")?
            .ok_or_else(|| AppError::NotFound("Alert not found".to_string()))
    }

    pub async fn create(&self, request: CreateAlertRequest) -> AppResult<Alert> {
        let alert = request.into_new_alert()?;
        let created = self
            .repository
            .create(alert)
            .await
            .or_fail("Failed to create alert")?;
        info!(
            "📢 Alert {} created ({}, {})",
            created.id,
            created.alert_type.as_str(),
            created.severity.as_str()
        );
        Ok(created)
    }

    pub async fn update(&self, id: i32, request: UpdateAlertRequest) -> AppResult<Alert> {
        request.validate()?;
        self.repository
            .update(id, request)
            .await
            .or_fail("Failed to update alert")?
            .ok_or_else(|| AppError::NotFound("Alert not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<DeleteResponse> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .or_fail("Failed to delete alert")?;
        if !deleted {
            return Err(AppError::NotFound("Alert not found".to_string()));
        }
        info!("🗑️ Alert {} deleted", id);
        Ok(DeleteResponse::deleted(id))
    }
}
