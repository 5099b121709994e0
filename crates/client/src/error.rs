use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("Server rejected the request with status '{0}'")]
    Rejected(String),
    #[error("The username must be a valid email address.")]
    InvalidUsername,
    #[error("The password must be at least 8 characters long.")]
    InvalidPassword,
    #[error("Only admin can delete accounts.")]
    Unauthorized,
    #[error("Account {0} not found")]
    NotFound(i32),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Input problems the user can fix, as opposed to transport/server failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidUsername | ClientError::InvalidPassword | ClientError::Unauthorized
        )
    }
}
