//! Repositories
//!
//! One async trait per resource. Each has a PostgreSQL implementation that
//! goes through the [`Database`](crate::database::Database) adapter and an
//! in-memory implementation seeded with the demo rows. Updates are
//! last-write-wins in both.

pub mod alert_repository;
pub mod memory;
pub mod route_repository;
pub mod schedule_repository;
pub mod user_repository;

use async_trait::async_trait;

use crate::database::StoreError;
use crate::models::{
    Alert, AlertChanges, AlertFilters, NewAlert, NewRoute, NewSchedule, Route, RouteChanges,
    Schedule, ScheduleChanges, ScheduleFilters, User, UserRecord,
};

pub use alert_repository::{MemoryAlertRepository, PgAlertRepository};
pub use route_repository::{MemoryRouteRepository, PgRouteRepository};
pub use schedule_repository::{MemoryScheduleRepository, PgScheduleRepository};
pub use user_repository::{DemoUserDirectory, PgUserDirectory};

#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Every route ordered by number
    async fn list(&self) -> Result<Vec<Route>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Route>, StoreError>;
    async fn create(&self, route: NewRoute) -> Result<Route, StoreError>;
    /// `None` when no route has this id
    async fn update(&self, id: i32, changes: RouteChanges) -> Result<Option<Route>, StoreError>;
    /// `false` when no route has this id
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Matching alerts, newest first
    async fn list(&self, filters: &AlertFilters) -> Result<Vec<Alert>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Alert>, StoreError>;
    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError>;
    async fn update(&self, id: i32, changes: AlertChanges) -> Result<Option<Alert>, StoreError>;
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Matching entries ordered by day then time
    async fn list(&self, filters: &ScheduleFilters) -> Result<Vec<Schedule>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Schedule>, StoreError>;
    async fn create(&self, schedule: NewSchedule) -> Result<Schedule, StoreError>;
    async fn update(&self, id: i32, changes: ScheduleChanges)
        -> Result<Option<Schedule>, StoreError>;
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// The single source of truth for credentials
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn children_of(&self, parent_id: &str) -> Result<Vec<User>, StoreError>;
}
