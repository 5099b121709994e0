pub mod entities;
pub mod services;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::db::entities::account;

/// Columns added after the first release; back-filled on older databases.
const LATE_COLUMNS: [&str; 2] = ["added_time", "remark"];

pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(max_connections);

    Database::connect(opt).await
}

/// Creates the `accounts` table if needed and adds any column an older
/// database is missing. Not a migration system: columns are only ever added.
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut create_accounts = schema.create_table_from_entity(account::Entity);
    create_accounts.if_not_exists();
    db.execute(backend.build(&create_accounts)).await?;

    for column in LATE_COLUMNS {
        let sql = format!("ALTER TABLE accounts ADD COLUMN {column} TEXT");
        match db.execute_unprepared(&sql).await {
            Ok(_) => info!(column, "Added missing column to accounts table."),
            Err(e) if e.to_string().contains("duplicate column") => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
