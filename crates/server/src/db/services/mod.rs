//! Data access for the HTTP handlers. Each function issues a single statement.

pub mod account_service;

pub use account_service::*;
