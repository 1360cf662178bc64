//! Validation helpers
//!
//! Custom validators plugged into `#[derive(Validate)]` request types, and
//! the body, path and query extractors whose rejections use the API error
//! shape.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use chrono::NaiveTime;
use serde::de::DeserializeOwned;
use validator::ValidationError;

use crate::utils::errors::AppError;

/// `Json<T>` whose rejection is a 400 `{ "error": ... }` body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// `Path<T>` rejected as a 400 `{ "error": ... }` body
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(PathParam(value))
    }
}

/// `Query<T>` rejected as a 400 `{ "error": ... }` body
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// A required text field that is present but blank counts as missing
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Optional text that, when sent, must not be blank
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Departure time in `HH:MM`
pub fn clock_time(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M").map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_text_reports_required() {
        let err = required_text("   ").unwrap_err();
        assert_eq!(err.code, "required");
        assert!(required_text("101").is_ok());
    }

    #[test]
    fn not_blank_uses_its_own_code() {
        assert_eq!(not_blank("").unwrap_err().code, "blank");
    }

    #[test]
    fn clock_time_accepts_hh_mm_only() {
        assert!(clock_time("07:45").is_ok());
        assert!(clock_time("23:59").is_ok());
        assert!(clock_time("7.45").is_err());
        assert!(clock_time("25:00").is_err());
    }
}
