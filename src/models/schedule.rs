//! Schedule model

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{clock_time, not_blank};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    OnTime,
    Delayed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ServiceDay {
    Weekday,
    Saturday,
    Sunday,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::OnTime => "on-time",
            ScheduleStatus::Delayed => "delayed",
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-time" => Ok(ScheduleStatus::OnTime),
            "delayed" => Ok(ScheduleStatus::Delayed),
            other => Err(format!("unknown schedule status '{}'", other)),
        }
    }
}

impl ServiceDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceDay::Weekday => "weekday",
            ServiceDay::Saturday => "saturday",
            ServiceDay::Sunday => "sunday",
        }
    }
}

impl FromStr for ServiceDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekday" => Ok(ServiceDay::Weekday),
            "saturday" => Ok(ServiceDay::Saturday),
            "sunday" => Ok(ServiceDay::Sunday),
            other => Err(format!("unknown service day '{}'", other)),
        }
    }
}

/// A departure: static per-day entry, tied to a route only by its number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i32,
    /// `HH:MM`
    pub time: String,
    pub destination: String,
    pub route: String,
    pub status: ScheduleStatus,
    pub day: ServiceDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub time: String,
    pub destination: String,
    pub route: String,
    pub status: ScheduleStatus,
    pub day: ServiceDay,
}

impl NewSchedule {
    pub fn with_id(self, id: i32) -> Schedule {
        Schedule {
            id,
            time: self.time,
            destination: self.destination,
            route: self.route,
            status: self.status,
            day: self.day,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "clock_time")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<ServiceDay>,
}

impl Schedule {
    pub fn apply(&mut self, changes: ScheduleChanges) {
        if let Some(time) = changes.time {
            self.time = time;
        }
        if let Some(destination) = changes.destination {
            self.destination = destination;
        }
        if let Some(route) = changes.route {
            self.route = route;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(day) = changes.day {
            self.day = day;
        }
    }
}

/// Query string filters for `GET /api/schedules`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleFilters {
    pub day: Option<ServiceDay>,
    pub route: Option<String>,
}

impl ScheduleFilters {
    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.day.map_or(true, |day| schedule.day == day)
            && self.route.as_deref().map_or(true, |route| schedule.route == route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case() {
        let json = serde_json::to_value(ScheduleStatus::OnTime).unwrap();
        assert_eq!(json, "on-time");
        assert_eq!("on-time".parse::<ScheduleStatus>(), Ok(ScheduleStatus::OnTime));
    }

    #[test]
    fn filters_combine_day_and_route() {
        let schedule = NewSchedule {
            time: "07:15".to_string(),
            destination: "Lincoln Elementary".to_string(),
            route: "101".to_string(),
            status: ScheduleStatus::OnTime,
            day: ServiceDay::Weekday,
        }
        .with_id(1);

        let filters = ScheduleFilters {
            day: Some(ServiceDay::Weekday),
            route: Some("101".to_string()),
        };
        assert!(filters.matches(&schedule));

        let other_route = ScheduleFilters {
            route: Some("202".to_string()),
            ..Default::default()
        };
        assert!(!other_route.matches(&schedule));
    }
}
