pub mod alert_controller;
pub mod auth_controller;
pub mod route_controller;
pub mod schedule_controller;
