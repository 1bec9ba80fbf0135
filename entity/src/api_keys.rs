//! # API 密钥实体定义
//!
//! 访问凭证表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// API 密钥实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub key_value: String,
    pub description: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::api_key_usage::Entity")]
    ApiKeyUsage,
}

impl Related<super::api_key_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiKeyUsage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
