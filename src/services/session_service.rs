//! Sessions
//!
//! A session is a signed HS256 token whose `jti` names an entry in the
//! [`SessionStore`]. Both must agree for the session to be live, so logout
//! only has to drop the store entry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::{Session, SessionClaims};
use crate::utils::errors::{AppError, AppResult};

/// Signs and verifies session tokens
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a new session for `user_id`
    pub fn issue(&self, user_id: &str) -> AppResult<Session> {
        // whole seconds, the token cannot carry more
        let issued_at = timestamp(Utc::now().timestamp())?;
        let expires_at = issued_at + self.ttl;
        let claims = SessionClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("could not sign session token: {}", e)))?;

        Ok(Session {
            id: claims.jti,
            user_id: claims.sub,
            token,
            issued_at,
            expires_at,
        })
    }

    /// Check signature and expiry
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Token(e.to_string()))
    }
}

fn timestamp(seconds: i64) -> AppResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| AppError::Internal(format!("timestamp out of range: {}", seconds)))
}

/// Where live sessions are kept
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session);
    async fn get(&self, id: &str) -> Option<Session>;
    /// `false` when there was nothing to revoke
    async fn revoke(&self, id: &str) -> bool;
    /// Drop expired sessions, returning how many went
    async fn purge_expired(&self) -> usize;
}

/// Sessions held in process memory; a restart signs everyone out
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session);
        debug!("🔑 {} live sessions", sessions.len());
    }

    async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn revoke(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", Duration::days(7))
    }

    #[test]
    fn issued_token_verifies_with_the_same_secret() {
        let session = signer().issue("1").unwrap();
        let claims = signer().verify(&session.token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.jti, session.id);
        assert_eq!(session.expires_at - session.issued_at, Duration::days(7));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let session = TokenSigner::new("other", Duration::days(7)).issue("1").unwrap();
        assert!(matches!(signer().verify(&session.token), Err(AppError::Token(_))));
        assert!(signer().verify("not-a-token").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let session = TokenSigner::new("test-secret", Duration::seconds(-60))
            .issue("1")
            .unwrap();
        assert!(signer().verify(&session.token).is_err());
    }

    #[tokio::test]
    async fn revoked_session_is_gone() {
        let store = MemorySessionStore::new();
        let session = signer().issue("2").unwrap();
        store.insert(session.clone()).await;

        assert_eq!(store.get(&session.id).await, Some(session.clone()));
        assert!(store.revoke(&session.id).await);
        assert!(!store.revoke(&session.id).await);
        assert!(store.get(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn purge_drops_only_expired_sessions() {
        let store = MemorySessionStore::new();
        store.insert(signer().issue("1").unwrap()).await;
        store
            .insert(TokenSigner::new("test-secret", Duration::seconds(-1)).issue("2").unwrap())
            .await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.purge_expired().await, 0);
    }
}
