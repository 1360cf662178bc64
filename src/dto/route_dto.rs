use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::route::{NewRoute, RouteChanges, RouteStatus};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::required_text;

/// Request to create a route. Every field is optional on the wire so a
/// missing one surfaces as a 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub start_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub end_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, range(min = 0))]
    pub stops: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RouteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_accessible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_express: Option<bool>,
}

impl CreateRouteRequest {
    /// Validate and fill in defaults
    pub fn into_new_route(self) -> AppResult<NewRoute> {
        self.validate()?;

        Ok(NewRoute {
            number: self.number.ok_or(AppError::MissingFields)?,
            name: self.name.ok_or(AppError::MissingFields)?,
            frequency: self.frequency.ok_or(AppError::MissingFields)?,
            start_point: self.start_point.ok_or(AppError::MissingFields)?,
            end_point: self.end_point.ok_or(AppError::MissingFields)?,
            stops: self.stops.ok_or(AppError::MissingFields)?,
            status: self.status.unwrap_or(RouteStatus::Active),
            is_accessible: self.is_accessible.unwrap_or(false),
            is_express: self.is_express.unwrap_or(false),
        })
    }
}

/// Request to update a route
pub type UpdateRouteRequest = RouteChanges;

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CreateRouteRequest {
        CreateRouteRequest {
            number: Some("303".to_string()),
            name: Some("Riverside Loop".to_string()),
            frequency: Some("Every 20 min".to_string()),
            start_point: Some("Riverside Park".to_string()),
            end_point: Some("Washington Middle School".to_string()),
            stops: Some(8),
            ..Default::default()
        }
    }

    #[test]
    fn complete_request_gets_defaults() {
        let route = complete().into_new_route().unwrap();
        assert_eq!(route.number, "303");
        assert_eq!(route.status, RouteStatus::Active);
        assert!(!route.is_accessible);
        assert!(!route.is_express);
    }

    #[test]
    fn each_required_field_is_enforced() {
        let strip: [fn(&mut CreateRouteRequest); 6] = [
            |r| r.number = None,
            |r| r.name = None,
            |r| r.frequency = None,
            |r| r.start_point = None,
            |r| r.end_point = None,
            |r| r.stops = None,
        ];
        for remove in strip {
            let mut request = complete();
            remove(&mut request);
            assert!(matches!(request.into_new_route(), Err(AppError::MissingFields)));
        }
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut request = complete();
        request.name = Some("  ".to_string());
        assert!(matches!(request.into_new_route(), Err(AppError::MissingFields)));
    }

    #[test]
    fn negative_stops_is_a_validation_error() {
        let mut request = complete();
        request.stops = Some(-1);
        assert!(matches!(request.into_new_route(), Err(AppError::Validation(_))));
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let request: CreateRouteRequest = serde_json::from_value(serde_json::json!({
            "number": "404",
            "name": "Hillside",
            "frequency": "Hourly",
            "startPoint": "Hill Top",
            "endPoint": "Oak High",
            "stops": 5,
            "isExpress": true
        }))
        .unwrap();
        let route = request.into_new_route().unwrap();
        assert_eq!(route.start_point, "Hill Top");
        assert!(route.is_express);
    }
}
