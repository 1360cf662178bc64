//! Typed client for the API
//!
//! [`ResourceClient`] keeps a local copy of one collection (routes, alerts
//! or schedules) and [`AuthClient`] tracks the session, both over a shared
//! cookie-carrying [`ApiClient`].

pub mod api_client;
pub mod auth;
pub mod error;
pub mod resource;

pub use api_client::ApiClient;
pub use auth::{AuthClient, AuthState};
pub use error::ClientError;
pub use resource::{LoadState, Resource, ResourceClient};
