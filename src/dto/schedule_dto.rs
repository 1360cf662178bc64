use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::schedule::{NewSchedule, ScheduleChanges, ScheduleStatus, ServiceDay};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{clock_time, required_text};

/// Request to create a schedule entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "clock_time")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required)]
    pub day: Option<ServiceDay>,
}

impl CreateScheduleRequest {
    pub fn into_new_schedule(self) -> AppResult<NewSchedule> {
        self.validate()?;

        Ok(NewSchedule {
            time: self.time.ok_or(AppError::MissingFields)?,
            destination: self.destination.ok_or(AppError::MissingFields)?,
            route: self.route.ok_or(AppError::MissingFields)?,
            status: self.status.unwrap_or(ScheduleStatus::OnTime),
            day: self.day.ok_or(AppError::MissingFields)?,
        })
    }
}

/// Request to update a schedule entry
pub type UpdateScheduleRequest = ScheduleChanges;
