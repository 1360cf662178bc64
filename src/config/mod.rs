//! Project configuration
//!
//! Database settings, environment variables and the other knobs of the
//! service.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
