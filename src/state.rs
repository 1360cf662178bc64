//! Shared application state
//!
//! Cloned into every handler by axum. The repositories and the identity
//! source are chosen once, from configuration, when the state is built.

use std::sync::Arc;

use tracing::info;

use crate::config::{EnvironmentConfig, IdentitySource, StorageBackend};
use crate::database::seed::{demo_alerts, demo_routes, demo_schedules};
use crate::database::Database;
use crate::repositories::{
    AlertRepository, DemoUserDirectory, MemoryAlertRepository, MemoryRouteRepository,
    MemoryScheduleRepository, PgAlertRepository, PgRouteRepository, PgScheduleRepository,
    PgUserDirectory, RouteRepository, ScheduleRepository, UserDirectory,
};
use crate::services::{AuthService, MemorySessionStore, TokenSigner};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub database: Database,
    pub routes: Arc<dyn RouteRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Build the state for `config`. With the postgres backend every
    /// repository goes through `database`, reachable or not.
    pub fn new(config: EnvironmentConfig, database: Database) -> AppResult<Self> {
        let (routes, alerts, schedules): (
            Arc<dyn RouteRepository>,
            Arc<dyn AlertRepository>,
            Arc<dyn ScheduleRepository>,
        ) = match config.storage_backend {
            StorageBackend::Postgres => (
                Arc::new(PgRouteRepository::new(database.clone())),
                Arc::new(PgAlertRepository::new(database.clone())),
                Arc::new(PgScheduleRepository::new(database.clone())),
            ),
            StorageBackend::Memory => (
                Arc::new(MemoryRouteRepository::new(demo_routes())),
                Arc::new(MemoryAlertRepository::new(demo_alerts())),
                Arc::new(MemoryScheduleRepository::new(demo_schedules())),
            ),
        };

        let users: Arc<dyn UserDirectory> = match config.identity_source {
            IdentitySource::Demo => Arc::new(DemoUserDirectory::new(config.bcrypt_cost)?),
            IdentitySource::Database => Arc::new(PgUserDirectory::new(database.clone())),
        };

        let auth = AuthService::new(
            users,
            Arc::new(MemorySessionStore::new()),
            TokenSigner::new(&config.session_secret, config.session_ttl),
        );

        info!(
            "🧩 State ready: {} storage, {} identities",
            config.storage_backend.as_str(),
            config.identity_source.as_str()
        );

        Ok(Self {
            config: Arc::new(config),
            database,
            routes,
            alerts,
            schedules,
            auth: Arc::new(auth),
        })
    }

    /// Memory storage seeded with the demo rows and no database at all
    pub fn in_memory(mut config: EnvironmentConfig) -> AppResult<Self> {
        config.storage_backend = StorageBackend::Memory;
        config.identity_source = IdentitySource::Demo;
        Self::new(config, Database::unavailable())
    }
}
