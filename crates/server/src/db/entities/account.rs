use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub password: String,
    pub gpt_status: bool,
    pub midjourney_status: bool,
    // JSON object serialized to text
    #[sea_orm(column_type = "Text")]
    pub custom_platforms: String,
    pub usage_count: i32,
    // Nullable for rows written before these columns existed
    pub added_time: Option<String>,
    pub remark: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
