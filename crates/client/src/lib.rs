pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod manager;

pub use api::{AccountsApi, RetryPolicy};
pub use error::ClientError;
pub use manager::{AccountDraft, AccountManager, AddOutcome, EditFields, RefreshOutcome};
