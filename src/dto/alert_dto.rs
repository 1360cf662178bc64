use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::alert::{AlertChanges, AlertSeverity, AlertStatus, AlertType, NewAlert};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::required_text;

/// Request to create an alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required, custom = "required_text")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(required)]
    pub alert_type: Option<AlertType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required)]
    pub severity: Option<AlertSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_routes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateAlertRequest {
    pub fn into_new_alert(self) -> AppResult<NewAlert> {
        self.validate()?;

        Ok(NewAlert {
            title: self.title.ok_or(AppError::MissingFields)?,
            description: self.description.ok_or(AppError::MissingFields)?,
            alert_type: self.alert_type.ok_or(AppError::MissingFields)?,
            severity: self.severity.ok_or(AppError::MissingFields)?,
            affected_routes: self.affected_routes.unwrap_or_default(),
            status: self.status.unwrap_or(AlertStatus::Active),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

/// Request to update an alert
pub type UpdateAlertRequest = AlertChanges;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_status_routes_and_timestamp() {
        let before = Utc::now();
        let alert = CreateAlertRequest {
            title: Some("Station closed".to_string()),
            description: Some("Elm St stop closed today".to_string()),
            alert_type: Some(AlertType::Station),
            severity: Some(AlertSeverity::Low),
            ..Default::default()
        }
        .into_new_alert()
        .unwrap();

        assert_eq!(alert.status, AlertStatus::Active);
        assert!(alert.affected_routes.is_empty());
        assert!(alert.timestamp >= before);
    }

    #[test]
    fn missing_severity_is_rejected() {
        let result = CreateAlertRequest {
            title: Some("Delay".to_string()),
            description: Some("Snow".to_string()),
            alert_type: Some(AlertType::Delay),
            ..Default::default()
        }
        .into_new_alert();
        assert!(matches!(result, Err(AppError::MissingFields)));
    }
}
