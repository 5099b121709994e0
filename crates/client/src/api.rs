//! Thin wrapper over the account server's REST endpoints.
//!
//! Every call is one request/response round-trip. Only listing is retried,
//! see [`AccountsApi::list_accounts_with_retry`].

use account_manager_common::{Account, AccountUpdate, AdminCredentials, NewAccount, StatusResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone)]
pub struct AccountsApi {
    client: Client,
    base_url: String,
}

impl AccountsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ClientError> {
        let response = self.client.get(self.url("/accounts")).send().await?;
        Self::decode(response).await
    }

    /// Lists accounts, retrying any failure up to `policy.attempts` times in
    /// total with a fixed sleep in between. Returns the last error.
    pub async fn list_accounts_with_retry(
        &self,
        policy: &RetryPolicy,
    ) -> Result<Vec<Account>, ClientError> {
        let max_attempts = policy.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(attempt, "Fetching accounts.");
            match self.list_accounts().await {
                Ok(accounts) => return Ok(accounts),
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "Error fetching accounts, retrying.");
                    tokio::time::sleep(policy.delay).await;
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "Giving up fetching accounts.");
                    return Err(e);
                }
            }
        }
    }

    pub async fn create_account(&self, account: &NewAccount) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/accounts"))
            .json(account)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_account(
        &self,
        account_id: i32,
        update: &AccountUpdate,
    ) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/accounts/{account_id}")))
            .json(update)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_account(&self, account_id: i32) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/accounts/{account_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn verify_admin(&self, username: &str, password: &str) -> Result<bool, ClientError> {
        let credentials = AdminCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/verify_admin"))
            .json(&credentials)
            .send()
            .await?;
        let status: StatusResponse = Self::decode(response).await?;
        Ok(status.is_success())
    }
}
