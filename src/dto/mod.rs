//! Request types
//!
//! Create payloads keep every field optional so the handlers can answer a
//! missing field with the fixed 400 message.

pub mod alert_dto;
pub mod route_dto;
pub mod schedule_dto;

pub use alert_dto::{CreateAlertRequest, UpdateAlertRequest};
pub use route_dto::{CreateRouteRequest, UpdateRouteRequest};
pub use schedule_dto::{CreateScheduleRequest, UpdateScheduleRequest};

use serde::{Deserialize, Serialize};

/// Body returned by a successful DELETE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: i32,
}

impl DeleteResponse {
    pub fn deleted(id: i32) -> Self {
        Self { success: true, id }
    }
}
