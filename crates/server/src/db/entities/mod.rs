//! SeaORM entities mapping the database tables.

pub mod account;
