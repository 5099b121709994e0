use account_manager_common::{Account, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Accounts used this many times or more are shown as exhausted.
pub const USAGE_LIMIT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageState {
    Available,
    Exhausted,
}

impl UsageState {
    pub fn label(self) -> &'static str {
        match self {
            UsageState::Available => "available",
            UsageState::Exhausted => "exhausted",
        }
    }
}

pub fn usage_state(usage_count: i32) -> UsageState {
    if usage_count >= USAGE_LIMIT {
        UsageState::Exhausted
    } else {
        UsageState::Available
    }
}

/// Time since `added_time` as "N days, M hours". Days are floored, so a
/// timestamp in the future yields a negative day count with positive hours.
pub fn format_elapsed(added_time: &str, now: NaiveDateTime) -> String {
    let Ok(added) = NaiveDateTime::parse_from_str(added_time, TIMESTAMP_FORMAT) else {
        return "unknown".to_string();
    };
    let total_seconds = (now - added).num_seconds();
    let days = total_seconds.div_euclid(86_400);
    let hours = total_seconds.rem_euclid(86_400) / 3_600;
    format!("{days} days, {hours} hours")
}

fn flag(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

pub fn render_table(accounts: &[Account], now: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:>5}  {:<32}  {:<20}  {:<3}  {:<3}  {:>5}  {:<9}  {:<20}  {}",
        "#", "id", "username", "password", "GPT", "MJ", "usage", "state", "added", "remark"
    );
    for (row, account) in accounts.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:>5}  {:<32}  {:<20}  {:<3}  {:<3}  {:>5}  {:<9}  {:<20}  {}",
            row + 1,
            account.id,
            account.username,
            account.password,
            flag(account.gpt_status),
            flag(account.midjourney_status),
            account.usage_count,
            usage_state(account.usage_count).label(),
            format_elapsed(&account.added_time, now),
            account.remark.replace('\n', " "),
        );
    }
    if accounts.is_empty() {
        out.push_str("(no accounts)\n");
    }
    out
}
