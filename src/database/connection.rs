//! PostgreSQL persistence adapter
//!
//! Wraps an optional connection pool. When the pool was never established
//! every call fails with [`StoreError::Unavailable`]; callers decide whether
//! that is fatal.

use std::time::Instant;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{Execute, FromRow, PgPool, Postgres};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence adapter not available")]
    Unavailable,

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Handle to the relational store
#[derive(Clone, Debug, Default)]
pub struct Database {
    pool: Option<PgPool>,
}

impl Database {
    /// Try to establish the pool. Never fails: a missing URL or a refused
    /// connection leaves the adapter unavailable.
    pub async fn connect(config: &DatabaseConfig) -> Self {
        let Some(url) = config.url.as_deref() else {
            warn!("⚠️ DATABASE_URL not set, persistence adapter unavailable");
            return Self::unavailable();
        };

        info!("🗄️ Connecting to {}", mask_database_url(url));
        match config.create_pool(url).await {
            Ok(pool) => {
                info!("✅ Database pool established");
                Self::from_pool(pool)
            }
            Err(e) => {
                error!("❌ Could not connect to the database: {}", e);
                Self::unavailable()
            }
        }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn unavailable() -> Self {
        Self { pool: None }
    }

    pub fn is_available(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool.as_ref().ok_or(StoreError::Unavailable)
    }

    /// Run a query and return every row
    pub async fn fetch_all<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> Result<Vec<O>, StoreError>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let pool = self.pool()?;
        let sql = query.sql();
        let started = Instant::now();
        let result = query.fetch_all(pool).await;
        log_outcome(sql, started, result.as_ref().map(|rows| rows.len()));
        Ok(result?)
    }

    /// Run a query that yields zero or one row
    pub async fn fetch_optional<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> Result<Option<O>, StoreError>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let pool = self.pool()?;
        let sql = query.sql();
        let started = Instant::now();
        let result = query.fetch_optional(pool).await;
        log_outcome(sql, started, result.as_ref().map(|row| usize::from(row.is_some())));
        Ok(result?)
    }

    /// Run a query that must yield exactly one row
    pub async fn fetch_one<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> Result<O, StoreError>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let pool = self.pool()?;
        let sql = query.sql();
        let started = Instant::now();
        let result = query.fetch_one(pool).await;
        log_outcome(sql, started, result.as_ref().map(|_| 1));
        Ok(result?)
    }

    /// Run a statement and return the number of affected rows
    pub async fn execute<'q>(&self, query: Query<'q, Postgres, PgArguments>) -> Result<u64, StoreError> {
        let pool = self.pool()?;
        let sql = query.sql();
        let started = Instant::now();
        let result = query.execute(pool).await.map(|done| done.rows_affected());
        log_outcome(sql, started, result.as_ref().map(|n| *n as usize));
        Ok(result?)
    }

    /// Cheap round trip used by the health endpoint
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.execute(sqlx::query("SELECT 1")).await.map(|_| ())
    }
}

/// Log the statement and its duration
fn log_outcome(sql: &str, started: Instant, outcome: Result<usize, &sqlx::Error>) {
    let elapsed = started.elapsed();
    match outcome {
        Ok(rows) => debug!("🗄️ {:?} ({} rows) {}", elapsed, rows, compact(sql)),
        Err(e) => warn!("🗄️ {:?} failed: {} | {}", elapsed, e, compact(sql)),
    }
}

fn compact(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
