//! Utilities shared by the handlers: error mapping and request validation.

pub mod errors;
pub mod validation;
