//! Session cookies
//!
//! Reading the `auth_token` / `user_id` cookie pair off a request, resolving
//! it to a user, and building the `Set-Cookie` headers for login and logout.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use chrono::Duration;

use crate::models::auth::{AUTH_TOKEN_COOKIE, USER_ID_COOKIE};
use crate::models::User;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// The session cookie pair as sent by the client. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionCookies {
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
}

impl SessionCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = SessionCookies::default();
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            for pair in value.split(';') {
                let Some((name, content)) = pair.trim().split_once('=') else {
                    continue;
                };
                if content.is_empty() {
                    continue;
                }
                match name {
                    AUTH_TOKEN_COOKIE => cookies.auth_token = Some(content.to_string()),
                    USER_ID_COOKIE => cookies.user_id = Some(content.to_string()),
                    _ => {}
                }
            }
        }
        cookies
    }

    /// The signed-in user, if the pair still names a live session
    pub async fn resolve(&self, state: &AppState) -> AppResult<Option<User>> {
        match (&self.auth_token, &self.user_id) {
            (Some(token), Some(user_id)) => state.auth.check(token, user_id).await,
            _ => Ok(None),
        }
    }

    pub async fn require_user(&self, state: &AppState) -> AppResult<User> {
        self.resolve(state)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionCookies::from_headers(&parts.headers))
    }
}

/// A request that must come from a signed-in user
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionCookies::from_headers(&parts.headers)
            .require_user(state)
            .await?;
        Ok(CurrentUser(user))
    }
}

/// Gate a create/update/delete on `permission` when write enforcement is
/// on. With it off every write is let through without touching sessions.
pub async fn authorize_write(
    state: &AppState,
    cookies: &SessionCookies,
    permission: &str,
) -> AppResult<()> {
    if !state.config.require_auth_for_writes {
        return Ok(());
    }
    let user = cookies.require_user(state).await?;
    state.auth.authorize(&user, permission)
}

fn cookie(name: &str, value: &str, max_age: i64, http_only: bool, secure: bool) -> AppResult<HeaderValue> {
    let mut cookie = format!("{}={}; Path=/; SameSite=Lax; Max-Age={}", name, value, max_age);
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("invalid cookie value: {}", e)))
}

/// `Set-Cookie` values opening a session
pub fn session_cookies(
    token: &str,
    user_id: &str,
    ttl: Duration,
    secure: bool,
) -> AppResult<[HeaderValue; 2]> {
    let max_age = ttl.num_seconds();
    Ok([
        cookie(AUTH_TOKEN_COOKIE, token, max_age, true, secure)?,
        cookie(USER_ID_COOKIE, user_id, max_age, false, secure)?,
    ])
}

/// `Set-Cookie` values that make the browser drop both cookies
pub fn cleared_cookies(secure: bool) -> AppResult<[HeaderValue; 2]> {
    Ok([
        cookie(AUTH_TOKEN_COOKIE, "", 0, true, secure)?,
        cookie(USER_ID_COOKIE, "", 0, false, secure)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_cookies_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc.def.ghi; user_id=2"),
        );
        let cookies = SessionCookies::from_headers(&headers);
        assert_eq!(cookies.auth_token.as_deref(), Some("abc.def.ghi"));
        assert_eq!(cookies.user_id.as_deref(), Some("2"));
    }

    #[test]
    fn empty_values_count_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=; user_id=1"));
        let cookies = SessionCookies::from_headers(&headers);
        assert!(cookies.auth_token.is_none());
        assert_eq!(cookies.user_id.as_deref(), Some("1"));
    }

    #[test]
    fn session_cookie_attributes() {
        let [token, user] = session_cookies("tok", "1", Duration::days(7), false).unwrap();
        let token = token.to_str().unwrap();
        assert!(token.starts_with("auth_token=tok;"));
        assert!(token.contains("Max-Age=604800"));
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("SameSite=Lax"));
        assert!(!token.contains("Secure"));

        let user = user.to_str().unwrap();
        assert!(user.starts_with("user_id=1;"));
        assert!(!user.contains("HttpOnly"));
    }

    #[test]
    fn cleared_cookies_expire_immediately() {
        let [token, user] = cleared_cookies(true).unwrap();
        assert!(token.to_str().unwrap().contains("Max-Age=0"));
        assert!(user.to_str().unwrap().contains("Secure"));
    }
}
