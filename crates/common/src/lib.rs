//! Types shared by the account server and its client.

pub mod models;
pub mod ordering;

pub use models::*;
pub use ordering::{compare_accounts, sort_accounts};
