use account_manager_common::AdminCredentials;
use tracing::warn;

use crate::config::ServerConfig;

/// Checks a login pair against the configured admin account.
///
/// Only a yes/no answer is produced; no session or token is issued and no
/// other endpoint consults the result.
pub fn verify_admin(config: &ServerConfig, credentials: &AdminCredentials) -> bool {
    let valid = credentials.username == config.admin_username
        && credentials.password == config.admin_password;
    if !valid {
        warn!(username = %credentials.username, "Admin verification failed.");
    }
    valid
}
