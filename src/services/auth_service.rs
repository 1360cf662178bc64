//! Authentication
//!
//! Login against the configured [`UserDirectory`], session checks and
//! logout. The HTTP layer turns sessions into cookies; nothing here knows
//! about headers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::authorization_service;
use super::session_service::{SessionStore, TokenSigner};
use crate::models::auth::Session;
use crate::models::{User, UserRole};
use crate::repositories::UserDirectory;
use crate::utils::errors::{AppError, AppResult, StoreResultExt};

/// Message returned for any failed login
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            sessions,
            signer,
        }
    }

    /// Verify the credentials and open a session. `None` for an unknown
    /// username or a wrong password; the caller cannot tell which.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Option<(User, Session)>> {
        let record = self
            .users
            .find_by_username(username)
            .await
            .or_fail("Failed to sign in")?;

        let Some(record) = record else {
            info!("🔒 Login rejected for unknown user '{}'", username);
            return Ok(None);
        };

        if !bcrypt::verify(password, &record.password_hash)? {
            info!("🔒 Login rejected for '{}': wrong password", username);
            return Ok(None);
        }

        let session = self.signer.issue(&record.user.id)?;
        self.sessions.insert(session.clone()).await;
        info!(
            "✅ '{}' signed in as {} until {}",
            username, record.user.role, session.expires_at
        );
        Ok(Some((record.user, session)))
    }

    /// Resolve the user behind a token and user id pair. Any mismatch,
    /// expiry or revocation reads as signed out.
    pub async fn check(&self, token: &str, user_id: &str) -> AppResult<Option<User>> {
        let claims = match self.signer.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("🔑 Session token rejected: {}", e);
                return Ok(None);
            }
        };

        let Some(session) = self.sessions.get(&claims.jti).await else {
            debug!("🔑 No live session {}", claims.jti);
            return Ok(None);
        };

        if session.is_expired() {
            self.sessions.revoke(&session.id).await;
            return Ok(None);
        }

        if session.token != token || session.user_id != claims.sub || claims.sub != user_id {
            warn!("⚠️ Session {} presented with a mismatched user id", session.id);
            return Ok(None);
        }

        self.users
            .find_by_id(&session.user_id)
            .await
            .or_fail("Failed to load user")
    }

    /// Revoke the session behind `token`. `false` when there was none.
    pub async fn logout(&self, token: &str) -> bool {
        match self.signer.verify(token) {
            Ok(claims) => {
                let revoked = self.sessions.revoke(&claims.jti).await;
                if revoked {
                    info!("👋 Session {} closed for user {}", claims.jti, claims.sub);
                }
                revoked
            }
            Err(_) => false,
        }
    }

    /// Children of a parent, as the caller is allowed to see them
    pub async fn children_of(&self, caller: &User, parent_id: &str) -> AppResult<Vec<User>> {
        let allowed = authorization_service::has_permission(caller.role, "manage_users")
            || (caller.role == UserRole::Parent && caller.id == parent_id);
        if !allowed {
            return Err(AppError::Forbidden(
                "Not allowed to view these children".to_string(),
            ));
        }

        let parent = self
            .users
            .find_by_id(parent_id)
            .await
            .or_fail("Failed to load children")?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.users
            .children_of(&parent.id)
            .await
            .or_fail("Failed to load children")
    }

    /// 403 unless `user`'s role grants `permission`
    pub fn authorize(&self, user: &User, permission: &str) -> AppResult<()> {
        if authorization_service::has_permission(user.role, permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Missing permission: {}", permission)))
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        self.signer.ttl()
    }

    pub async fn purge_expired_sessions(&self) -> usize {
        self.sessions.purge_expired().await
    }
}
