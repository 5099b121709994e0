use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format used for `added_time` on the wire and in storage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAIL: &str = "fail";

/// Free-form per-platform data. Persisted as JSON text and never interpreted.
pub type CustomPlatforms = serde_json::Map<String, serde_json::Value>;

/// Current local time in `TIMESTAMP_FORMAT`.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub gpt_status: bool,
    pub midjourney_status: bool,
    #[serde(default)]
    pub custom_platforms: CustomPlatforms,
    pub usage_count: i32,
    #[serde(default)]
    pub added_time: String,
    #[serde(default)]
    pub remark: String,
}

impl Account {
    /// Builds an update payload carrying every mutable field of this row.
    pub fn to_update(&self) -> AccountUpdate {
        AccountUpdate {
            username: Some(self.username.clone()),
            password: self.password.clone(),
            gpt_status: self.gpt_status,
            midjourney_status: self.midjourney_status,
            custom_platforms: self.custom_platforms.clone(),
            usage_count: self.usage_count,
            added_time: self.added_time.clone(),
            remark: self.remark.clone(),
        }
    }
}

/// Body of `POST /accounts`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub gpt_status: bool,
    #[serde(default)]
    pub midjourney_status: bool,
    #[serde(default)]
    pub custom_platforms: CustomPlatforms,
    #[serde(default)]
    pub usage_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_time: Option<String>,
    #[serde(default)]
    pub remark: String,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            gpt_status: false,
            midjourney_status: false,
            custom_platforms: CustomPlatforms::new(),
            usage_count: 0,
            added_time: None,
            remark: String::new(),
        }
    }
}

/// Body of `PUT /accounts/{id}`.
///
/// There is no merge with the stored row: `custom_platforms` and `remark`
/// fall back to empty values when omitted, everything else is required.
/// `username` is accepted for compatibility but never written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    pub gpt_status: bool,
    pub midjourney_status: bool,
    #[serde(default)]
    pub custom_platforms: CustomPlatforms,
    pub usage_count: i32,
    pub added_time: String,
    #[serde(default)]
    pub remark: String,
}

/// Missing fields read as empty and simply fail the check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
        }
    }

    pub fn fail() -> Self {
        Self {
            status: STATUS_FAIL.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
