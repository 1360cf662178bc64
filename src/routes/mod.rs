pub mod alert_routes;
pub mod auth_routes;
pub mod route_routes;
pub mod schedule_routes;
pub mod user_routes;
