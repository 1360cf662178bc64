//! Table creation
//!
//! Statements are idempotent (`IF NOT EXISTS`) and run once at startup when
//! `RUN_MIGRATIONS` is on. `created_at`/`updated_at` are written by the
//! repositories, not by triggers.

use tracing::info;

use super::connection::{Database, StoreError};

const SCHEMA: &str = include_str!("schema.sql");

/// Individual statements of the schema file
pub fn statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Create every table and index that does not exist yet
pub async fn migrate(db: &Database) -> Result<(), StoreError> {
    let mut applied = 0;
    for statement in statements() {
        db.execute(sqlx::query(statement)).await?;
        applied += 1;
    }
    info!("🧱 Schema ready ({} statements)", applied);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_every_table() {
        let creates: Vec<_> = statements()
            .filter(|s| s.starts_with("CREATE TABLE"))
            .collect();
        for table in ["users", "routes", "alerts", "schedules", "route_status"] {
            let needle = format!("CREATE TABLE IF NOT EXISTS {} (", table);
            assert!(creates.iter().any(|s| s.starts_with(&needle)), "missing {}", table);
        }
    }

    #[tokio::test]
    async fn migrate_needs_a_pool() {
        let result = migrate(&Database::unavailable()).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }
}
