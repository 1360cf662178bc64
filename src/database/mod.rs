//! Database module
//!
//! PostgreSQL adapter, schema creation and demo seed data.

pub mod connection;
pub mod schema;
pub mod seed;

pub use connection::{Database, StoreError};
