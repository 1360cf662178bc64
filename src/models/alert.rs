//! Alert model
//!
//! Service alerts raised by administrators. Alerts never expire; they stay
//! until resolved or deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::not_blank;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Detour,
    Delay,
    Schedule,
    Station,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Detour => "detour",
            AlertType::Delay => "delay",
            AlertType::Schedule => "schedule",
            AlertType::Station => "station",
        }
    }
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
        }
    }
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detour" => Ok(AlertType::Detour),
            "delay" => Ok(AlertType::Delay),
            "schedule" => Ok(AlertType::Schedule),
            "station" => Ok(AlertType::Station),
            other => Err(format!("unknown alert type '{}'", other)),
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            other => Err(format!("unknown alert severity '{}'", other)),
        }
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AlertStatus::Active),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(format!("unknown alert status '{}'", other)),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    /// Route numbers, not ids
    pub affected_routes: Vec<String>,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub title: String,
    pub description: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub affected_routes: Vec<String>,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
}

impl NewAlert {
    pub fn with_id(self, id: i32) -> Alert {
        Alert {
            id,
            title: self.title,
            description: self.description,
            alert_type: self.alert_type,
            severity: self.severity,
            affected_routes: self.affected_routes,
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

/// Partial update merged server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlertChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<AlertType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_routes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn apply(&mut self, changes: AlertChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(alert_type) = changes.alert_type {
            self.alert_type = alert_type;
        }
        if let Some(severity) = changes.severity {
            self.severity = severity;
        }
        if let Some(affected_routes) = changes.affected_routes {
            self.affected_routes = affected_routes;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(timestamp) = changes.timestamp {
            self.timestamp = timestamp;
        }
    }
}

/// Query string filters for `GET /api/alerts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilters {
    pub status: Option<AlertStatus>,
}

impl AlertFilters {
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.map_or(true, |status| alert.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_field_uses_reserved_name_on_the_wire() {
        let alert = NewAlert {
            title: "Detour on Main St".to_string(),
            description: "Road works".to_string(),
            alert_type: AlertType::Detour,
            severity: AlertSeverity::Medium,
            affected_routes: vec!["101".to_string()],
            status: AlertStatus::Active,
            timestamp: Utc::now(),
        }
        .with_id(7);

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "detour");
        assert_eq!(json["affectedRoutes"][0], "101");
    }

    #[test]
    fn resolving_keeps_the_rest_of_the_alert() {
        let mut alert = NewAlert {
            title: "Delay".to_string(),
            description: "Traffic".to_string(),
            alert_type: AlertType::Delay,
            severity: AlertSeverity::High,
            affected_routes: vec![],
            status: AlertStatus::Active,
            timestamp: Utc::now(),
        }
        .with_id(1);

        alert.apply(AlertChanges {
            status: Some(AlertStatus::Resolved),
            ..Default::default()
        });
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert_eq!(alert.title, "Delay");
        assert!(!AlertFilters { status: Some(AlertStatus::Active) }.matches(&alert));
    }
}
