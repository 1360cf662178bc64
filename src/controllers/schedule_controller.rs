use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::{CreateScheduleRequest, DeleteResponse, UpdateScheduleRequest};
use crate::models::{Schedule, ScheduleFilters};
use crate::repositories::ScheduleRepository;
use crate::utils::errors::{AppError, AppResult, StoreResultExt};

pub struct ScheduleController {
    repository: Arc<dyn ScheduleRepository>,
}

impl ScheduleController {
    pub fn new(repository: Arc<dyn ScheduleRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filters: &ScheduleFilters) -> AppResult<Vec<Schedule>> {
        self.repository
            .list(filters)
            .await
            .or_fail("Failed to load schedules")
    }

    pub async fn get(&self, id: i32) -> AppResult<Schedule> {
        self.repository
            .find_by_id(id)
            .await
            .or_fail("Failed to load schedule")?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))
    }

    pub async fn create(&self, request: CreateScheduleRequest) -> AppResult<Schedule> {
        let schedule = request.into_new_schedule()?;
        let created = self
            .repository
            .create(schedule)
            .await
            .or_fail("Failed to create schedule")?;
        info!(
            "🕒 Schedule {} created: route {} at {} ({})",
            created.id,
            created.route,
            created.time,
            created.day.as_str()
        );
        Ok(created)
    }

    pub async fn update(&self, id: i32, request: UpdateScheduleRequest) -> AppResult<Schedule> {
        request.validate()?;
        self.repository
            .update(id, request)
            .await
            .or_fail("Failed to update schedule")?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<DeleteResponse> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .or_fail("Failed to delete schedule")?;
        if !deleted {
            return Err(AppError::NotFound("Schedule not found".to_string()));
        }
        info!("🗑️ Schedule {} deleted", id);
        Ok(DeleteResponse::deleted(id))
    }
}
