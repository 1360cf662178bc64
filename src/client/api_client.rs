//! HTTP transport shared by the resource and auth clients
//!
//! Cookies set by the server are kept in a jar and sent back on every
//! request, the way a browser would.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ClientError;
use crate::models::auth::{AUTH_TOKEN_COOKIE, USER_ID_COOKIE};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Client for the API served at `base_url`, e.g. `http://localhost:3000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self {
            http,
            base_url,
            jar,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!("➡️ GET {}", path);
        let response = self.http.get(self.url(path)?).send().await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("➡️ POST {}", path);
        let response = self.http.post(self.url(path)?).json(body).send().await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("➡️ PUT {}", path);
        let response = self.http.put(self.url(path)?).json(body).send().await?;
        decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!("➡️ DELETE {}", path);
        let response = self.http.delete(self.url(path)?).send().await?;
        decode(response).await
    }

    /// Whether the jar holds a cookie named `name` for the API host
    pub fn has_cookie(&self, name: &str) -> bool {
        let Some(header) = self.jar.cookies(&self.base_url) else {
            return false;
        };
        let Ok(header) = header.to_str() else {
            return false;
        };
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(cookie, value)| cookie == name && !value.is_empty())
    }

    /// Both session cookies are present
    pub fn has_session_cookies(&self) -> bool {
        self.has_cookie(AUTH_TOKEN_COOKIE) && self.has_cookie(USER_ID_COOKIE)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
