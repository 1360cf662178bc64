use async_trait::async_trait;
use chrono::Utc;

use super::memory::MemoryTable;
use super::RouteRepository;
use crate::database::{Database, StoreError};
use crate::models::{NewRoute, Route, RouteChanges};

const ROUTE_COLUMNS: &str =
    "id, number, name, frequency, start_point, end_point, stops, status, is_accessible, is_express";

/// Row of the routes table
#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
    id: i32,
    number: String,
    name: String,
    frequency: String,
    start_point: String,
    end_point: String,
    stops: i32,
    status: String,
    is_accessible: bool,
    is_express: bool,
}

impl TryFrom<RouteRow> for Route {
    type Error = StoreError;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        Ok(Route {
            id: row.id,
            number: row.number,
            name: row.name,
            frequency: row.frequency,
            start_point: row.start_point,
            end_point: row.end_point,
            stops: row.stops,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            is_accessible: row.is_accessible,
            is_express: row.is_express,
        })
    }
}

pub struct PgRouteRepository {
    db: Database,
}

impl PgRouteRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn list(&self) -> Result<Vec<Route>, StoreError> {
        let sql = format!("SELECT {} FROM routes ORDER BY number", ROUTE_COLUMNS);
        let rows = self
            .db
            .fetch_all(sqlx::query_as::<_, RouteRow>(&sql))
            .await?;
        rows.into_iter().map(Route::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Route>, StoreError> {
        let sql = format!("SELECT {} FROM routes WHERE id = $1", ROUTE_COLUMNS);
        let row = self
            .db
            .fetch_optional(sqlx::query_as::<_, RouteRow>(&sql).bind(id))
            .await?;
        row.map(Route::try_from).transpose()
    }

    async fn create(&self, route: NewRoute) -> Result<Route, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO routes (number, name, frequency, start_point, end_point, stops, status, is_accessible, is_express, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );
        let row = self
            .db
            .fetch_one(
                sqlx::query_as::<_, RouteRow>(&sql)
                    .bind(route.number)
                    .bind(route.name)
                    .bind(route.frequency)
                    .bind(route.start_point)
                    .bind(route.end_point)
                    .bind(route.stops)
                    .bind(route.status.as_str())
                    .bind(route.is_accessible)
                    .bind(route.is_express)
                    .bind(Utc::now()),
            )
            .await?;
        Route::try_from(row)
    }

    async fn update(&self, id: i32, changes: RouteChanges) -> Result<Option<Route>, StoreError> {
        let sql = format!(
            r#"
            UPDATE routes
            SET number = COALESCE($2, number),
                name = COALESCE($3, name),
                frequency = COALESCE($4, frequency),
                start_point = COALESCE($5, start_point),
                end_point = COALESCE($6, end_point),
                stops = COALESCE($7, stops),
                status = COALESCE($8, status),
                is_accessible = COALESCE($9, is_accessible),
                is_express = COALESCE($10, is_express),
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );
        let row = self
            .db
            .fetch_optional(
                sqlx::query_as::<_, RouteRow>(&sql)
                    .bind(id)
                    .bind(changes.number)
                    .bind(changes.name)
                    .bind(changes.frequency)
                    .bind(changes.start_point)
                    .bind(changes.end_point)
                    .bind(changes.stops)
                    .bind(changes.status.map(|s| s.as_str()))
                    .bind(changes.is_accessible)
                    .bind(changes.is_express)
                    .bind(Utc::now()),
            )
            .await?;
        row.map(Route::try_from).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let affected = self
            .db
            .execute(sqlx::query("DELETE FROM routes WHERE id = $1").bind(id))
            .await?;
        Ok(affected > 0)
    }
}

pub struct MemoryRouteRepository {
    table: MemoryTable<Route>,
}

impl MemoryRouteRepository {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            table: MemoryTable::with_rows(routes),
        }
    }
}

#[async_trait]
impl RouteRepository for MemoryRouteRepository {
    async fn list(&self) -> Result<Vec<Route>, StoreError> {
        let mut routes = self.table.all().await;
        routes.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(routes)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Route>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, route: NewRoute) -> Result<Route, StoreError> {
        Ok(self.table.insert(|id| route.with_id(id)).await)
    }

    async fn update(&self, id: i32, changes: RouteChanges) -> Result<Option<Route>, StoreError> {
        Ok(self.table.modify(id, |route| route.apply(changes)).await)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.remove(id).await)
    }
}
