//! Data models
//!
//! Domain types served by the API. JSON uses camelCase; the repositories
//! map them onto snake_case columns.

pub mod alert;
pub mod auth;
pub mod route;
pub mod schedule;
pub mod user;

pub use alert::{Alert, AlertChanges, AlertFilters, AlertSeverity, AlertStatus, AlertType, NewAlert};
pub use route::{NewRoute, Route, RouteChanges, RouteStatus};
pub use schedule::{NewSchedule, Schedule, ScheduleChanges, ScheduleFilters, ScheduleStatus, ServiceDay};
pub use user::{User, UserRecord, UserRole};
