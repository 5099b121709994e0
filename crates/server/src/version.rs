/// Release builds may stamp `ACCOUNT_SERVER_VERSION`; otherwise the crate version is used.
pub const VERSION: &str = match option_env!("ACCOUNT_SERVER_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
