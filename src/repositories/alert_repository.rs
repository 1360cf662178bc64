use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::memory::MemoryTable;
use super::AlertRepository;
use crate::database::{Database, StoreError};
use crate::models::{Alert, AlertChanges, AlertFilters, NewAlert};

const ALERT_COLUMNS: &str =
    "id, title, description, alert_type, severity, affected_routes, status, issued_at";

#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: i32,
    title: String,
    description: String,
    alert_type: String,
    severity: String,
    affected_routes: Vec<String>,
    status: String,
    issued_at: DateTime<Utc>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = StoreError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            title: row.title,
            description: row.description,
            alert_type: row.alert_type.parse().map_err(StoreError::Corrupt)?,
            severity: row.severity.parse().map_err(StoreError::Corrupt)?,
            affected_routes: row.affected_routes,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            timestamp: row.issued_at,
        })
    }
}

pub struct PgAlertRepository {
    db: Database,
}

impl PgAlertRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn list(&self, filters: &AlertFilters) -> Result<Vec<Alert>, StoreError> {
        let sql = format!(
            "SELECT {} FROM alerts WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY issued_at DESC",
            ALERT_COLUMNS
        );
        let rows = self
            .db
            .fetch_all(
                sqlx::query_as::<_, AlertRow>(&sql).bind(filters.status.map(|s| s.as_str())),
            )
            .await?;
        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Alert>, StoreError> {
        let sql = format!("SELECT {} FROM alerts WHERE id = $1", ALERT_COLUMNS);
        let row = self
            .db
            .fetch_optional(sqlx::query_as::<_, AlertRow>(&sql).bind(id))
            .await?;
        row.map(Alert::try_from).transpose()
    }

    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO alerts (title, description, alert_type, severity, affected_routes, status, issued_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {}
            "#,
            ALERT_COLUMNS
        );
        let row = self
            .db
            .fetch_one(
                sqlx::query_as::<_, AlertRow>(&sql)
                    .bind(alert.title)
                    .bind(alert.description)
                    .bind(alert.alert_type.as_str())
                    .bind(alert.severity.as_str())
                    .bind(alert.affected_routes)
                    .bind(alert.status.as_str())
                    .bind(alert.timestamp)
                    .bind(Utc::now()),
            )
            .await?;
        Alert::try_from(row)
    }

    async fn update(&self, id: i32, changes: AlertChanges) -> Result<Option<Alert>, StoreError> {
        let sql = format!(
            r#"
            UPDATE alerts
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                alert_type = COALESCE($4, alert_type),
                severity = COALESCE($5, severity),
                affected_routes = COALESCE($6, affected_routes),
                status = COALESCE($7, status),
                issued_at = COALESCE($8, issued_at),
                updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            ALERT_COLUMNS
        );
        let row = self
            .db
            .fetch_optional(
                sqlx::query_as::<_, AlertRow>(&sql)
                    .bind(id)
                    .bind(changes.title)
                    .bind(changes.description)
                    .bind(changes.alert_type.map(|t| t.as_str()))
                    .bind(changes.severity.map(|s| s.as_str()))
                    .bind(changes.affected_routes)
                    .bind(changes.status.map(|s| s.as_str()))
                    .bind(changes.timestamp)
                    .bind(Utc::now()),
            )
            .await?;
        row.map(Alert::try_from).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let affected = self
            .db
            .execute(sqlx::query("DELETE FROM alerts WHERE id = $1").bind(id))
            .await?;
        Ok(affected > 0)
    }
}

pub struct MemoryAlertRepository {
    table: MemoryTable<Alert>,
}

impl MemoryAlertRepository {
    pub fn new(alerts: Vec<NewAlert>) -> Self {
        let rows = alerts
            .into_iter()
            .zip(1..)
            .map(|(alert, id)| alert.with_id(id))
            .collect();
        Self {
            table: MemoryTable::with_rows(rows),
        }
    }
}

#[async_trait]
impl AlertRepository for MemoryAlertRepository {
    async fn list(&self, filters: &AlertFilters) -> Result<Vec<Alert>, StoreError> {
        let mut alerts: Vec<_> = self
            .table
            .all()
            .await
            .into_iter()
            .filter(|a| filters.matches(a))
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(alerts)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Alert>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        Ok(self.table.insert(|id| alert.with_id(id)).await)
    }

    async fn update(&self, id: i32, changes: AlertChanges) -> Result<Option<Alert>, StoreError> {
        Ok(self.table.modify(id, |alert| alert.apply(changes)).await)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.remove(id).await)
    }
}
