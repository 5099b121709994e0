use account_manager_common::{
    now_timestamp, sort_accounts, Account, AccountUpdate, NewAccount, StatusResponse,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::api::{AccountsApi, RetryPolicy};
use crate::error::ClientError;

lazy_static! {
    // Prefix match, like the form check of the desktop client.
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern is valid");
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_username(username: &str) -> Result<(), ClientError> {
    if EMAIL_PATTERN.is_match(username) {
        Ok(())
    } else {
        Err(ClientError::InvalidUsername)
    }
}

pub fn validate_password(password: &str) -> Result<(), ClientError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ClientError::InvalidPassword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Loaded(Vec<Account>),
    /// Another fetch was in flight; this one was dropped.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added,
    /// Another add was in flight; this one was dropped.
    Skipped,
}

/// Input of the "add account" form.
#[derive(Debug, Clone, Default)]
pub struct AccountDraft {
    pub username: String,
    pub password: String,
    pub added_time: Option<String>,
    pub remark: String,
}

/// Fields the edit form can change. Username and custom platforms are kept.
#[derive(Debug, Clone)]
pub struct EditFields {
    pub password: String,
    pub gpt_status: bool,
    pub midjourney_status: bool,
    pub usage_count: i32,
    pub added_time: String,
    pub remark: String,
}

impl From<&Account> for EditFields {
    fn from(account: &Account) -> Self {
        Self {
            password: account.password.clone(),
            gpt_status: account.gpt_status,
            midjourney_status: account.midjourney_status,
            usage_count: account.usage_count,
            added_time: account.added_time.clone(),
            remark: account.remark.clone(),
        }
    }
}

/// Client-side workflow around the REST calls.
///
/// At most one fetch and one add run at a time; a second request of either
/// kind is dropped instead of queued. Admin login only gates deletes made
/// through this manager, the server does not enforce it.
pub struct AccountManager {
    api: AccountsApi,
    retry: RetryPolicy,
    fetch_lock: Mutex<()>,
    add_lock: Mutex<()>,
    admin_logged_in: AtomicBool,
    accounts: RwLock<Vec<Account>>,
}

impl AccountManager {
    pub fn new(api: AccountsApi, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            fetch_lock: Mutex::new(()),
            add_lock: Mutex::new(()),
            admin_logged_in: AtomicBool::new(false),
            accounts: RwLock::new(Vec::new()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin_logged_in.load(Ordering::SeqCst)
    }

    /// Last successfully loaded, sorted account list.
    pub async fn snapshot(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }

    pub async fn find_account(&self, account_id: i32) -> Result<Account, ClientError> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|account| account.id == account_id)
            .cloned()
            .ok_or(ClientError::NotFound(account_id))
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        let Ok(_guard) = self.fetch_lock.try_lock() else {
            info!("Fetch accounts already in progress.");
            return Ok(RefreshOutcome::Skipped);
        };

        let mut accounts = self
            .api
            .list_accounts_with_retry(&self.retry)
            .await
            .inspect_err(|e| error!(error = %e, "Error in fetching accounts."))?;
        for account in accounts.iter_mut() {
            if account.added_time.is_empty() {
                account.added_time = now_timestamp();
            }
        }
        sort_accounts(&mut accounts);

        info!(count = accounts.len(), "Accounts loaded.");
        *self.accounts.write().await = accounts.clone();
        Ok(RefreshOutcome::Loaded(accounts))
    }

    pub async fn add_account(&self, draft: AccountDraft) -> Result<AddOutcome, ClientError> {
        validate_username(&draft.username)?;
        validate_password(&draft.password)?;

        let Ok(_guard) = self.add_lock.try_lock() else {
            info!("Add account already in progress.");
            return Ok(AddOutcome::Skipped);
        };

        let mut new_account = NewAccount::new(draft.username, draft.password);
        new_account.added_time = Some(draft.added_time.unwrap_or_else(now_timestamp));
        new_account.remark = draft.remark;

        info!(username = %new_account.username, "Sending request to create account.");
        let status = self.api.create_account(&new_account).await?;
        ensure_success(status)?;

        self.refresh_after_write().await;
        Ok(AddOutcome::Added)
    }

    pub async fn edit_account(
        &self,
        account: &Account,
        fields: EditFields,
    ) -> Result<RefreshOutcome, ClientError> {
        let update = AccountUpdate {
            username: Some(account.username.clone()),
            password: fields.password,
            gpt_status: fields.gpt_status,
            midjourney_status: fields.midjourney_status,
            custom_platforms: account.custom_platforms.clone(),
            usage_count: fields.usage_count,
            added_time: fields.added_time,
            remark: fields.remark,
        };

        info!(account_id = account.id, username = %account.username, "Editing account.");
        let status = self.api.update_account(account.id, &update).await?;
        ensure_success(status)?;
        Ok(self.refresh_after_write().await)
    }

    pub async fn edit_remark(
        &self,
        account: &Account,
        remark: &str,
    ) -> Result<RefreshOutcome, ClientError> {
        let mut update = account.to_update();
        update.remark = remark.to_string();

        info!(account_id = account.id, username = %account.username, "Editing remark.");
        let status = self.api.update_account(account.id, &update).await?;
        ensure_success(status)?;
        Ok(self.refresh_after_write().await)
    }

    /// Asks the server to check the admin pair. A successful login sticks for
    /// the lifetime of the manager.
    pub async fn login_admin(&self, username: &str, password: &str) -> Result<bool, ClientError> {
        let verified = self.api.verify_admin(username, password).await?;
        if verified {
            self.admin_logged_in.store(true, Ordering::SeqCst);
            info!(username, "Admin logged in.");
        }
        Ok(verified)
    }

    pub async fn delete_account(&self, account: &Account) -> Result<RefreshOutcome, ClientError> {
        if !self.is_admin() {
            return Err(ClientError::Unauthorized);
        }

        info!(account_id = account.id, username = %account.username, "Deleting account.");
        let status = self.api.delete_account(account.id).await?;
        ensure_success(status)?;
        Ok(self.refresh_after_write().await)
    }

    /// The change already landed on the server, so a failed reload is only
    /// logged. Falls back to the cached list.
    async fn refresh_after_write(&self) -> RefreshOutcome {
        match self.refresh().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Reload after a successful change failed.");
                RefreshOutcome::Loaded(self.snapshot().await)
            }
        }
    }
}

fn ensure_success(status: StatusResponse) -> Result<(), ClientError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Rejected(status.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn offline_manager() -> AccountManager {
        // Nothing listens on port 9 locally; validation must fail before any request.
        let api = AccountsApi::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        AccountManager::new(
            api,
            RetryPolicy {
                attempts: 1,
                delay: Duration::from_millis(1),
            },
        )
    }

    #[test]
    fn test_username_pattern() {
        assert!(validate_username("user@example.com").is_ok());
        assert!(validate_username("a@b.c").is_ok());
        assert!(validate_username("first.last@sub.domain.org").is_ok());
        assert!(validate_username("no-at-sign.com").is_err());
        assert!(validate_username("user@nodot").is_err());
        assert!(validate_username("@example.com").is_err());
        assert!(validate_username("user@.").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("").is_err());
        // 8 characters, more than 8 bytes
        assert!(validate_password("密码密码密码密码").is_ok());
        assert!(validate_password("密码密码密码密").is_err());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input_before_network() {
        let manager = offline_manager();

        let bad_user = AccountDraft {
            username: "not-an-email".into(),
            password: "longenough".into(),
            ..Default::default()
        };
        assert!(matches!(
            manager.add_account(bad_user).await,
            Err(ClientError::InvalidUsername)
        ));

        let bad_password = AccountDraft {
            username: "ok@example.com".into(),
            password: "short".into(),
            ..Default::default()
        };
        assert!(matches!(
            manager.add_account(bad_password).await,
            Err(ClientError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_admin_login() {
        let manager = offline_manager();
        let account = Account {
            id: 1,
            username: "a@b.co".into(),
            password: "12345678".into(),
            gpt_status: false,
            midjourney_status: false,
            custom_platforms: Default::default(),
            usage_count: 0,
            added_time: "2024-01-01 00:00:00".into(),
            remark: String::new(),
        };

        let result = manager.delete_account(&account).await;
        assert!(matches!(result, Err(ClientError::Unauthorized)));
        assert!(!manager.is_admin());
    }

    #[tokio::test]
    async fn test_find_account_on_empty_snapshot() {
        let manager = offline_manager();
        assert!(matches!(
            manager.find_account(3).await,
            Err(ClientError::NotFound(3))
        ));
    }

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(StatusResponse::success()).is_ok());
        assert!(matches!(
            ensure_success(StatusResponse::fail()),
            Err(ClientError::Rejected(s)) if s == "fail"
        ));
    }
}
