//! Services module
//!
//! Authentication, sessions and the role permission table. Resource CRUD has
//! no service layer; controllers talk to the repositories directly.

pub mod auth_service;
pub mod authorization_service;
pub mod session_service;

pub use auth_service::AuthService;
pub use session_service::{MemorySessionStore, SessionStore, TokenSigner};
