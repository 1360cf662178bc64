//! Client-side session state

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, warn};

use super::api_client::ApiClient;
use super::error::ClientError;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::User;
use crate::services::authorization_service;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated(User),
}

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            api,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        match &*self.state.borrow() {
            AuthState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::Authenticated(_))
    }

    /// `Ok(false)` for rejected credentials; `Err` only when the server
    /// could not be asked.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, ClientError> {
        self.state.send_replace(AuthState::Authenticating);
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.api.post::<_, LoginResponse>("/api/auth/login", &request).await {
            Ok(LoginResponse {
                success: true,
                user: Some(user),
                ..
            }) => {
                info!("✅ Signed in as {}", user.username);
                self.state.send_replace(AuthState::Authenticated(user));
                Ok(true)
            }
            Ok(_) | Err(ClientError::Api { status: 401, .. }) => {
                self.state.send_replace(AuthState::Unauthenticated);
                Ok(false)
            }
            Err(e) => {
                warn!("⚠️ Login request failed: {}", e);
                self.state.send_replace(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    /// Ask the server whether the stored cookies still name a live session.
    /// A failed request signs the client out locally and returns the error.
    pub async fn check_auth(&self) -> Result<bool, ClientError> {
        if !self.api.has_session_cookies() {
            self.state.send_replace(AuthState::Unauthenticated);
            return Ok(false);
        }

        match self.api.get::<User>("/api/auth/me").await {
            Ok(user) => {
                self.state.send_replace(AuthState::Authenticated(user));
                Ok(true)
            }
            Err(ClientError::Api { status: 401, .. }) => {
                self.state.send_replace(AuthState::Unauthenticated);
                Ok(false)
            }
            Err(e) => {
                warn!("⚠️ Session check failed: {}", e);
                self.state.send_replace(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    /// Sign out locally even if the server cannot be reached
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.api.post::<_, Value>("/api/auth/logout", &()).await;
        self.state.send_replace(AuthState::Unauthenticated);
        result.map(|_| ())
    }

    /// Checked against the signed-in user's role; always `false` when
    /// signed out
    pub fn has_permission(&self, permission: &str) -> bool {
        match &*self.state.borrow() {
            AuthState::Authenticated(user) => {
                authorization_service::has_permission(user.role, permission)
            }
            _ => false,
        }
    }

    pub fn has_session_cookies(&self) -> bool {
        self.api.has_session_cookies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_client_has_no_permissions() {
        let auth = AuthClient::new(ApiClient::new("http://localhost:3000").unwrap());
        assert_eq!(auth.state(), AuthState::Unauthenticated);
        assert!(!auth.has_permission("view_routes"));
        assert!(auth.user().is_none());
    }
}
