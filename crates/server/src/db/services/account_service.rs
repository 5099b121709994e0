use account_manager_common::{now_timestamp, Account, AccountUpdate, CustomPlatforms, NewAccount};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::warn;

use crate::db::entities::account;

// --- Account Service Functions ---

fn encode_platforms(platforms: &CustomPlatforms) -> Result<String, DbErr> {
    serde_json::to_string(platforms)
        .map_err(|e| DbErr::Custom(format!("Failed to serialize custom_platforms: {e}")))
}

fn decode_platforms(id: i32, raw: &str) -> CustomPlatforms {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(account_id = id, error = %e, "Stored custom_platforms is not a JSON object, returning empty map.");
        CustomPlatforms::new()
    })
}

impl From<account::Model> for Account {
    fn from(model: account::Model) -> Self {
        let custom_platforms = decode_platforms(model.id, &model.custom_platforms);
        Account {
            id: model.id,
            username: model.username,
            password: model.password,
            gpt_status: model.gpt_status,
            midjourney_status: model.midjourney_status,
            custom_platforms,
            usage_count: model.usage_count,
            added_time: model.added_time.unwrap_or_else(now_timestamp),
            remark: model.remark.unwrap_or_default(),
        }
    }
}

/// Retrieves every account in insertion order.
pub async fn list_accounts(db: &DatabaseConnection) -> Result<Vec<Account>, DbErr> {
    let models = account::Entity::find()
        .order_by_asc(account::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Account::from).collect())
}

/// Inserts a new account. `added_time` defaults to now.
pub async fn create_account(
    db: &DatabaseConnection,
    new_account: NewAccount,
) -> Result<account::Model, DbErr> {
    let active = account::ActiveModel {
        username: Set(new_account.username),
        password: Set(new_account.password),
        gpt_status: Set(new_account.gpt_status),
        midjourney_status: Set(new_account.midjourney_status),
        custom_platforms: Set(encode_platforms(&new_account.custom_platforms)?),
        usage_count: Set(new_account.usage_count),
        added_time: Set(Some(new_account.added_time.unwrap_or_else(now_timestamp))),
        remark: Set(Some(new_account.remark)),
        ..Default::default()
    };
    active.insert(db).await
}

/// Overwrites every mutable column of one account. The username is never
/// changed. Returns the number of rows touched (0 for an unknown id).
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i32,
    update: AccountUpdate,
) -> Result<u64, DbErr> {
    let active = account::ActiveModel {
        password: Set(update.password),
        gpt_status: Set(update.gpt_status),
        midjourney_status: Set(update.midjourney_status),
        custom_platforms: Set(encode_platforms(&update.custom_platforms)?),
        usage_count: Set(update.usage_count),
        added_time: Set(Some(update.added_time)),
        remark: Set(Some(update.remark)),
        ..Default::default()
    };
    let result = account::Entity::update_many()
        .set(active)
        .filter(account::Column::Id.eq(account_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes one account by id. Returns the number of rows removed.
pub async fn delete_account(db: &DatabaseConnection, account_id: i32) -> Result<u64, DbErr> {
    let result = account::Entity::delete_by_id(account_id).exec(db).await?;
    Ok(result.rows_affected)
}
