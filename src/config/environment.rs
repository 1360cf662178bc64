//! Environment configuration
//!
//! Reads the service settings from environment variables (after `.env` has
//! been loaded by `dotenvy` in `main`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where resource rows live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("expected 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Which user directory login consults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Demo accounts held in process, hashed at startup
    Demo,
    /// The `users` table
    Database,
}

impl FromStr for IdentitySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(IdentitySource::Demo),
            "database" | "db" => Ok(IdentitySource::Database),
            other => Err(format!("expected 'demo' or 'database', got '{}'", other)),
        }
    }
}

impl IdentitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySource::Demo => "demo",
            IdentitySource::Database => "database",
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub storage_backend: StorageBackend,
    pub identity_source: IdentitySource,
    pub run_migrations: bool,
    pub seed_demo_data: bool,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
    pub require_auth_for_writes: bool,
    pub bcrypt_cost: u32,
    pub log_level: tracing::Level,
}

pub const DEFAULT_SESSION_SECRET: &str = "school-transit-demo-secret-change-me";

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
            storage_backend: StorageBackend::Postgres,
            identity_source: IdentitySource::Demo,
            run_migrations: true,
            seed_demo_data: true,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_ttl: chrono::Duration::days(7),
            cookie_secure: false,
            cors_origins: Vec::new(),
            require_auth_for_writes: false,
            bcrypt_cost: 4,
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl EnvironmentConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(environment) = var("ENVIRONMENT") {
            config.environment = environment;
        }
        if !config.is_development() {
            config.log_level = tracing::Level::INFO;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        config.port = parsed("PORT", config.port)?;

        config.database.url = var("DATABASE_URL");
        config.database.max_connections =
            parsed("DB_MAX_CONNECTIONS", config.database.max_connections)?;
        config.database.min_connections =
            parsed("DB_MIN_CONNECTIONS", config.database.min_connections)?;
        config.database.acquire_timeout = Duration::from_secs(parsed(
            "DB_ACQUIRE_TIMEOUT_SECS",
            config.database.acquire_timeout.as_secs(),
        )?);

        config.storage_backend = parsed("STORAGE_BACKEND", config.storage_backend)?;
        config.identity_source = parsed("IDENTITY_SOURCE", config.identity_source)?;
        config.run_migrations = parsed("RUN_MIGRATIONS", config.run_migrations)?;
        config.seed_demo_data = parsed("SEED_DEMO_DATA", config.seed_demo_data)?;

        if let Some(secret) = var("SESSION_SECRET") {
            config.session_secret = secret;
        }
        let ttl_days: i64 = parsed("SESSION_TTL_DAYS", config.session_ttl.num_days())?;
        config.session_ttl = chrono::Duration::days(ttl_days);
        config.cookie_secure = parsed("COOKIE_SECURE", config.cookie_secure)?;

        if let Some(origins) = var("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config.require_auth_for_writes =
            parsed("REQUIRE_AUTH_FOR_WRITES", config.require_auth_for_writes)?;
        config.bcrypt_cost = parsed("BCRYPT_COST", config.bcrypt_cost)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&config.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: config.bcrypt_cost.to_string(),
                reason: format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            });
        }
        config.log_level = parsed("LOG_LEVEL", config.log_level)?;

        Ok(config)
    }

    /// Development mode?
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Production mode?
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Address the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Cost bounds accepted by `bcrypt::hash`
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
