use async_trait::async_trait;
use chrono::Utc;

use super::memory::MemoryTable;
use super::ScheduleRepository;
use crate::database::{Database, StoreError};
use crate::models::{NewSchedule, Schedule, ScheduleChanges, ScheduleFilters};

const SCHEDULE_COLUMNS: &str = "id, departure_time, destination, route, status, service_day";

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i32,
    departure_time: String,
    destination: String,
    route: String,
    status: String,
    service_day: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = StoreError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(Schedule {
            id: row.id,
            time: row.departure_time,
            destination: row.destination,
            route: row.route,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            day: row.service_day.parse().map_err(StoreError::Corrupt)?,
        })
    }
}

pub struct PgScheduleRepository {
    db: Database,
}

impl PgScheduleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn list(&self, filters: &ScheduleFilters) -> Result<Vec<Schedule>, StoreError> {
        // weekday < saturday < sunday, not alphabetical
        let sql = format!(
            r#"
            SELECT {} FROM schedules
            WHERE ($1::TEXT IS NULL OR service_day = $1)
              AND ($2::TEXT IS NULL OR route = $2)
            ORDER BY CASE service_day WHEN 'weekday' THEN 0 WHEN 'saturday' THEN 1 ELSE 2 END,
                     departure_time
            "#,
            SCHEDULE_COLUMNS
        );
        let rows = self
            .db
            .fetch_all(
                sqlx::query_as::<_, ScheduleRow>(&sql)
                    .bind(filters.day.map(|d| d.as_str()))
                    .bind(filters.route.as_deref()),
            )
            .await?;
        rows.into_iter().map(Schedule::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Schedule>, StoreError> {
        let sql = format!("SELECT {} FROM schedules WHERE id = $1", SCHEDULE_COLUMNS);
        let row = self
            .db
            .fetch_optional(sqlx::query_as::<_, ScheduleRow>(&sql).bind(id))
            .await?;
        row.map(Schedule::try_from).transpose()
    }

    async fn create(&self, schedule: NewSchedule) -> Result<Schedule, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO schedules (departure_time, destination, route, status, service_day, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {}
            "#,
            SCHEDULE_COLUMNS
        );
        let row = self
            .db
            .fetch_one(
                sqlx::query_as::<_, ScheduleRow>(&sql)
                    .bind(schedule.time)
                    .bind(schedule.destination)
                    .bind(schedule.route)
                    .bind(schedule.status.as_str())
                    .bind(schedule.day.as_str())
                    .bind(Utc::now()),
            )
            .await?;
        Schedule::try_from(row)
    }

    async fn update(
        &self,
        id: i32,
        changes: ScheduleChanges,
    ) -> Result<Option<Schedule>, StoreError> {
        let sql = format!(
            r#"
            UPDATE schedules
            SET departure_time = COALESCE($2, departure_time),
                destination = COALESCE($3, destination),
                route = COALESCE($4, route),
                status = COALESCE($5, status),
                service_day = COALESCE($6, service_day),
                updated_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            SCHEDULE_COLUMNS
        );
        let row = self
            .db
            .fetch_optional(
                sqlx::query_as::<_, ScheduleRow>(&sql)
                    .bind(id)
                    .bind(changes.time)
                    .bind(changes.destination)
                    .bind(changes.route)
                    .bind(changes.status.map(|s| s.as_str()))
                    .bind(changes.day.map(|d| d.as_str()))
                    .bind(Utc::now()),
            )
            .await?;
        row.map(Schedule::try_from).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let affected = self
            .db
            .execute(sqlx::query("DELETE FROM schedules WHERE id = $1").bind(id))
            .await?;
        Ok(affected > 0)
    }
}

pub struct MemoryScheduleRepository {
    table: MemoryTable<Schedule>,
}

impl MemoryScheduleRepository {
    pub fn new(schedules: Vec<NewSchedule>) -> Self {
        let rows = schedules
            .into_iter()
            .zip(1..)
            .map(|(schedule, id)| schedule.with_id(id))
            .collect();
        Self {
            table: MemoryTable::with_rows(rows),
        }
    }
}

#[async_trait]
impl ScheduleRepository for MemoryScheduleRepository {
    async fn list(&self, filters: &ScheduleFilters) -> Result<Vec<Schedule>, StoreError> {
        let mut schedules: Vec<_> = self
            .table
            .all()
            .await
            .into_iter()
            .filter(|s| filters.matches(s))
            .collect();
        schedules.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.time.cmp(&b.time)));
        Ok(schedules)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Schedule>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, schedule: NewSchedule) -> Result<Schedule, StoreError> {
        Ok(self.table.insert(|id| schedule.with_id(id)).await)
    }

    async fn update(
        &self,
        id: i32,
        changes: ScheduleChanges,
    ) -> Result<Option<Schedule>, StoreError> {
        Ok(self.table.modify(id, |schedule| schedule.apply(changes)).await)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.remove(id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::seed::demo_schedules;
    use crate::models::ServiceDay;

    #[tokio::test]
    async fn weekday_entries_come_first_in_time_order() {
        let repo = MemoryScheduleRepository::new(demo_schedules());
        let all = repo.list(&ScheduleFilters::default()).await.unwrap();
        assert_eq!(all.first().map(|s| s.day), Some(ServiceDay::Weekday));
        assert_eq!(all.last().map(|s| s.day), Some(ServiceDay::Sunday));

        let weekday: Vec<_> = all.iter().filter(|s| s.day == ServiceDay::Weekday).collect();
        assert!(weekday.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[tokio::test]
    async fn filters_by_route() {
        let repo = MemoryScheduleRepository::new(demo_schedules());
        let filters = ScheduleFilters {
            route: Some("101".to_string()),
            ..Default::default()
        };
        let entries = repo.list(&filters).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|s| s.route == "101"));
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let repo = MemoryScheduleRepository::new(demo_schedules());
        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
    }
}
