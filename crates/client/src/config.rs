use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use tracing::{error, info};

use crate::api::RetryPolicy;

/// Used when `--config` is not given and the file exists in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "client_config.toml";

/// Environment variables with this prefix override the file values,
/// e.g. `ACCOUNT_CLIENT_SERVER_URL`.
pub const ENV_PREFIX: &str = "ACCOUNT_CLIENT_";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub refresh_interval_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_secs: u64,
    pub log_dir: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
struct PartialClientConfig {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    refresh_interval_secs: Option<u64>,
    retry_attempts: Option<u32>,
    retry_delay_secs: Option<u64>,
    log_dir: Option<String>,
    admin_username: Option<String>,
    admin_password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::merge(PartialClientConfig::default(), PartialClientConfig::default())
    }
}

impl ClientConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path) => read_file_config(Path::new(path), true)?,
            None => read_file_config(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };

        let env_config: PartialClientConfig = envy::prefixed(ENV_PREFIX)
            .from_env()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Ok(Self::merge(env_config, file_config))
    }

    fn merge(env_config: PartialClientConfig, file_config: PartialClientConfig) -> Self {
        ClientConfig {
            server_url: env_config
                .server_url
                .or(file_config.server_url)
                .unwrap_or_else(|| "http://127.0.0.1:12345".to_string()),
            request_timeout_secs: env_config
                .request_timeout_secs
                .or(file_config.request_timeout_secs)
                .unwrap_or(10),
            refresh_interval_secs: env_config
                .refresh_interval_secs
                .or(file_config.refresh_interval_secs)
                .unwrap_or(600),
            retry_attempts: env_config
                .retry_attempts
                .or(file_config.retry_attempts)
                .unwrap_or(3),
            retry_delay_secs: env_config
                .retry_delay_secs
                .or(file_config.retry_delay_secs)
                .unwrap_or(1),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(|| "logs".to_string()),
            admin_username: env_config.admin_username.or(file_config.admin_username),
            admin_password: env_config.admin_password.or(file_config.admin_password),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Never zero; a zero period would make the ticker panic.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

fn read_file_config(path: &Path, required: bool) -> Result<PartialClientConfig, String> {
    if !path.exists() {
        if required {
            error!(path = ?path, "Config file not found.");
            return Err(format!("Config file not found: {path:?}"));
        }
        return Ok(PartialClientConfig::default());
    }

    let config_str = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read client config file {path:?}: {e}"))?;
    let config: PartialClientConfig = toml::from_str(&config_str)
        .map_err(|e| format!("Failed to parse client config file {path:?}: {e}"))?;

    info!(path = ?path, "Loaded client config.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://127.0.0.1:12345");
        assert_eq!(config.refresh_interval(), Duration::from_secs(600));
        assert_eq!(
            config.retry_policy(),
            RetryPolicy {
                attempts: 3,
                delay: Duration::from_secs(1)
            }
        );
        assert!(config.admin_username.is_none());
    }

    #[test]
    fn test_file_values_and_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server_url = \"http://files:1\"\nretry_attempts = 5\nadmin_username = \"boss\""
        )
        .unwrap();

        let file_config = read_file_config(file.path(), true).unwrap();
        let env_config = PartialClientConfig {
            server_url: Some("http://env:2".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::merge(env_config, file_config);

        assert_eq!(config.server_url, "http://env:2");
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.admin_username.as_deref(), Some("boss"));
    }

    #[test]
    fn test_zero_refresh_interval_is_clamped() {
        let config = ClientConfig {
            refresh_interval_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(read_file_config(Path::new("/nonexistent/client.toml"), true).is_err());
        assert!(read_file_config(Path::new("/nonexistent/client.toml"), false).is_ok());
    }
}
