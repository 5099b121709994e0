pub mod account_routes;
pub mod admin_routes;
