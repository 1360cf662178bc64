//! Middleware and request extractors
//!
//! CORS configuration and the session cookie handling shared by the
//! handlers.

pub mod auth;
pub mod cors;

pub use auth::{authorize_write, CurrentUser, SessionCookies};
pub use cors::cors_middleware;
