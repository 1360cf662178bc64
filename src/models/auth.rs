use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{User, UserRole};

/// Name of the cookie carrying the session token
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
/// Name of the cookie carrying the user id
pub const USER_ID_COOKIE: &str = "user_id";

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Claims carried by the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // user_id
    pub jti: String, // session id
    pub exp: i64,
    pub iat: i64,
}

/// A live session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Permission listing for the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsResponse {
    pub role: UserRole,
    pub permissions: Vec<String>,
}

/// Answer to a single permission check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub allowed: bool,
}
