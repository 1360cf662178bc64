//! School transit API
//!
//! Routes, service alerts and departure schedules for a school transport
//! network, with cookie sessions for admins, parents and children. The
//! [`client`] module holds the typed HTTP client used by front ends.

pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::StorageBackend;
use crate::middleware::cors_middleware;
use crate::state::AppState;

/// The full API router with its layers
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/routes", routes::route_routes::create_route_router())
        .nest("/api/alerts", routes::alert_routes::create_alert_router())
        .nest("/api/schedules", routes::schedule_routes::create_schedule_router())
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/users", routes::user_routes::create_user_router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness plus the state of the store. Always 200.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.config.storage_backend {
        StorageBackend::Memory => "not used",
        StorageBackend::Postgres => match state.database.ping().await {
            Ok(()) => "connected",
            Err(_) => "unavailable",
        },
    };

    Json(json!({
        "status": "ok",
        "storage": state.config.storage_backend.as_str(),
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
