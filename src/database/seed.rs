//! Demo data
//!
//! The same rows back three things: the seed inserted into an empty
//! PostgreSQL database, the in-memory backend, and the fallback list served
//! by `GET /api/routes` when the store cannot be read.

use chrono::{Duration, Utc};
use tracing::info;

use super::connection::{Database, StoreError};
use crate::models::{
    AlertSeverity, AlertStatus, AlertType, NewAlert, NewRoute, NewSchedule, Route, RouteStatus,
    ScheduleStatus, ServiceDay, User, UserRole,
};

/// Routes served when the store is unreachable. Ids are fixed so clients can
/// still key on them.
pub fn demo_routes() -> Vec<Route> {
    vec![
        NewRoute {
            number: "101".to_string(),
            name: "Lincoln Elementary Express".to_string(),
            frequency: "Every 15 min".to_string(),
            start_point: "Central Station".to_string(),
            end_point: "Lincoln Elementary".to_string(),
            stops: 8,
            status: RouteStatus::Active,
            is_accessible: true,
            is_express: true,
        }
        .with_id(1),
        NewRoute {
            number: "202".to_string(),
            name: "Oak Ridge Line".to_string(),
            frequency: "Every 20 min".to_string(),
            start_point: "Maple Avenue".to_string(),
            end_point: "Oak Ridge Middle School".to_string(),
            stops: 12,
            status: RouteStatus::Active,
            is_accessible: true,
            is_express: false,
        }
        .with_id(2),
        NewRoute {
            number: "303".to_string(),
            name: "Riverside Shuttle".to_string(),
            frequency: "Every 30 min".to_string(),
            start_point: "Riverside Park".to_string(),
            end_point: "Washington High School".to_string(),
            stops: 10,
            status: RouteStatus::Limited,
            is_accessible: false,
            is_express: false,
        }
        .with_id(3),
    ]
}

pub fn demo_alerts() -> Vec<NewAlert> {
    let now = Utc::now();
    vec![
        NewAlert {
            title: "Detour on Main Street".to_string(),
            description: "Road works between 5th and 9th; buses use Elm Street.".to_string(),
            alert_type: AlertType::Detour,
            severity: AlertSeverity::Medium,
            affected_routes: vec!["101".to_string()],
            status: AlertStatus::Active,
            timestamp: now - Duration::hours(2),
        },
        NewAlert {
            title: "Morning delays".to_string(),
            description: "Heavy traffic near Maple Avenue, expect 10 minute delays.".to_string(),
            alert_type: AlertType::Delay,
            severity: AlertSeverity::High,
            affected_routes: vec!["202".to_string(), "303".to_string()],
            status: AlertStatus::Active,
            timestamp: now - Duration::minutes(30),
        },
    ]
}

pub fn demo_schedules() -> Vec<NewSchedule> {
    let entry = |time: &str, destination: &str, route: &str, status: ScheduleStatus, day: ServiceDay| NewSchedule {
        time: time.to_string(),
        destination: destination.to_string(),
        route: route.to_string(),
        status,
        day,
    };

    vec![
        entry("07:15", "Lincoln Elementary", "101", ScheduleStatus::OnTime, ServiceDay::Weekday),
        entry("07:30", "Oak Ridge Middle School", "202", ScheduleStatus::Delayed, ServiceDay::Weekday),
        entry("07:45", "Washington High School", "303", ScheduleStatus::OnTime, ServiceDay::Weekday),
        entry("15:10", "Central Station", "101", ScheduleStatus::OnTime, ServiceDay::Weekday),
        entry("09:00", "Riverside Park", "303", ScheduleStatus::OnTime, ServiceDay::Saturday),
        entry("10:00", "Maple Avenue", "202", ScheduleStatus::OnTime, ServiceDay::Sunday),
    ]
}

/// A demo account and its plain password, hashed before it is stored
pub struct DemoAccount {
    pub user: User,
    pub password: &'static str,
}

pub fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            user: User {
                id: "1".to_string(),
                username: "admin".to_string(),
                role: UserRole::Admin,
                name: "Admin User".to_string(),
                email: Some("admin@schooltransit.example".to_string()),
                age: None,
                school: None,
                grade: None,
                parent_id: None,
                children: vec![],
            },
            password: "123",
        },
        DemoAccount {
            user: User {
                id: "2".to_string(),
                username: "parent".to_string(),
                role: UserRole::Parent,
                name: "Sarah Johnson".to_string(),
                email: Some("sarah.johnson@example.com".to_string()),
                age: None,
                school: None,
                grade: None,
                parent_id: None,
                children: vec!["3".to_string()],
            },
            password: "parent123",
        },
        DemoAccount {
            user: User {
                id: "3".to_string(),
                username: "student".to_string(),
                role: UserRole::Child,
                name: "Emma Johnson".to_string(),
                email: None,
                age: Some(10),
                school: Some("Lincoln Elementary".to_string()),
                grade: Some("5th".to_string()),
                parent_id: Some("2".to_string()),
                children: vec![],
            },
            password: "student123",
        },
    ]
}

/// Insert the demo rows. Routes are skipped when their number already
/// exists, users when their id exists; alerts and schedules only go into
/// empty tables.
pub async fn seed(db: &Database, bcrypt_cost: u32) -> Result<(), StoreError> {
    let now = Utc::now();

    let mut routes_added = 0;
    for route in demo_routes() {
        routes_added += db
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO routes (number, name, frequency, start_point, end_point, stops, status, is_accessible, is_express, created_at, updated_at)
                    SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10
                    WHERE NOT EXISTS (SELECT 1 FROM routes WHERE number = $1)
                    "#,
                )
                .bind(&route.number)
                .bind(&route.name)
                .bind(&route.frequency)
                .bind(&route.start_point)
                .bind(&route.end_point)
                .bind(route.stops)
                .bind(route.status.as_str())
                .bind(route.is_accessible)
                .bind(route.is_express)
                .bind(now),
            )
            .await?;

        db.execute(
            sqlx::query(
                r#"
                INSERT INTO route_status (route_number, status, created_at, updated_at)
                VALUES ($1, $2, $3, $3)
                ON CONFLICT (route_number) DO NOTHING
                "#,
            )
            .bind(&route.number)
            .bind(route.status.as_str())
            .bind(now),
        )
        .await?;
    }

    let (alert_count,): (i64,) = db
        .fetch_one(sqlx::query_as("SELECT COUNT(*) FROM alerts"))
        .await?;
    if alert_count == 0 {
        for alert in demo_alerts() {
            db.execute(
                sqlx::query(
                    r#"
                    INSERT INTO alerts (title, description, alert_type, severity, affected_routes, status, issued_at, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
                    "#,
                )
                .bind(alert.title)
                .bind(alert.description)
                .bind(alert.alert_type.as_str())
                .bind(alert.severity.as_str())
                .bind(alert.affected_routes)
                .bind(alert.status.as_str())
                .bind(alert.timestamp)
                .bind(now),
            )
            .await?;
        }
    }

    let (schedule_count,): (i64,) = db
        .fetch_one(sqlx::query_as("SELECT COUNT(*) FROM schedules"))
        .await?;
    if schedule_count == 0 {
        for schedule in demo_schedules() {
            db.execute(
                sqlx::query(
                    r#"
                    INSERT INTO schedules (departure_time, destination, route, status, service_day, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $6)
                    "#,
                )
                .bind(schedule.time)
                .bind(schedule.destination)
                .bind(schedule.route)
                .bind(schedule.status.as_str())
                .bind(schedule.day.as_str())
                .bind(now),
            )
            .await?;
        }
    }

    let mut users_added = 0;
    for account in demo_accounts() {
        let password_hash = bcrypt::hash(account.password, bcrypt_cost)
            .map_err(|e| StoreError::Corrupt(format!("could not hash demo password: {}", e)))?;
        let user = account.user;
        users_added += db
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO users (id, username, password_hash, role, name, email, age, school, grade, parent_id, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(user.id)
                .bind(user.username)
                .bind(password_hash)
                .bind(user.role.as_str())
                .bind(user.name)
                .bind(user.email)
                .bind(user.age)
                .bind(user.school)
                .bind(user.grade)
                .bind(user.parent_id)
                .bind(now),
            )
            .await?;
    }

    info!(
        "🌱 Demo data seeded: {} new routes, {} new users",
        routes_added, users_added
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_routes_are_non_empty_and_sorted_by_number() {
        let routes = demo_routes();
        assert_eq!(routes.len(), 3);
        let numbers: Vec<_> = routes.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "202", "303"]);
    }

    #[test]
    fn child_points_at_its_parent() {
        let accounts = demo_accounts();
        let parent = accounts.iter().find(|a| a.user.role == UserRole::Parent).unwrap();
        let child = accounts.iter().find(|a| a.user.role == UserRole::Child).unwrap();
        assert_eq!(child.user.parent_id.as_deref(), Some(parent.user.id.as_str()));
        assert!(parent.user.children.contains(&child.user.id));
    }
}
