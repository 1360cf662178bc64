//! Route model
//!
//! A bus route as served by the API, plus the partial-update shape merged
//! server-side on `PUT /api/routes/{id}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::not_blank;

/// Operating status of a route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Active,
    Limited,
    Suspended,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Active => "active",
            RouteStatus::Limited => "limited",
            RouteStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for RouteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RouteStatus::Active),
            "limited" => Ok(RouteStatus::Limited),
            "suspended" => Ok(RouteStatus::Suspended),
            other => Err(format!("unknown route status '{}'", other)),
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i32,
    pub number: String,
    pub name: String,
    pub frequency: String,
    pub start_point: String,
    pub end_point: String,
    pub stops: i32,
    pub status: RouteStatus,
    pub is_accessible: bool,
    pub is_express: bool,
}

/// A validated route waiting for an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    pub number: String,
    pub name: String,
    pub frequency: String,
    pub start_point: String,
    pub end_point: String,
    pub stops: i32,
    pub status: RouteStatus,
    pub is_accessible: bool,
    pub is_express: bool,
}

impl NewRoute {
    pub fn with_id(self, id: i32) -> Route {
        Route {
            id,
            number: self.number,
            name: self.name,
            frequency: self.frequency,
            start_point: self.start_point,
            end_point: self.end_point,
            stops: self.stops,
            status: self.status,
            is_accessible: self.is_accessible,
            is_express: self.is_express,
        }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RouteChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub start_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "not_blank")]
    pub end_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub stops: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RouteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_accessible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_express: Option<bool>,
}

impl Route {
    /// Merge a partial update into this route
    pub fn apply(&mut self, changes: RouteChanges) {
        if let Some(number) = changes.number {
            self.number = number;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(start_point) = changes.start_point {
            self.start_point = start_point;
        }
        if let Some(end_point) = changes.end_point {
            self.end_point = end_point;
        }
        if let Some(stops) = changes.stops {
            self.stops = stops;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(is_accessible) = changes.is_accessible {
            self.is_accessible = is_accessible;
        }
        if let Some(is_express) = changes.is_express {
            self.is_express = is_express;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Route {
        Route {
            id: 1,
            number: "101".to_string(),
            name: "Downtown Express".to_string(),
            frequency: "Every 15 min".to_string(),
            start_point: "Central Station".to_string(),
            end_point: "Lincoln Elementary".to_string(),
            stops: 12,
            status: RouteStatus::Active,
            is_accessible: true,
            is_express: true,
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut route = sample();
        route.apply(RouteChanges {
            status: Some(RouteStatus::Suspended),
            stops: Some(9),
            ..Default::default()
        });

        assert_eq!(route.status, RouteStatus::Suspended);
        assert_eq!(route.stops, 9);
        assert_eq!(route.name, "Downtown Express");
        assert!(route.is_express);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["startPoint"], "Central Station");
        assert_eq!(json["isAccessible"], true);
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [RouteStatus::Active, RouteStatus::Limited, RouteStatus::Suspended] {
            assert_eq!(status.as_str().parse::<RouteStatus>(), Ok(status));
        }
        assert!("closed".parse::<RouteStatus>().is_err());
    }
}
