//! # 哈希密钥实体定义
//!
//! 独立身份库中的密钥表，`key_value` 保存 bcrypt 哈希而非明文

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 哈希密钥实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "hashed_api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub key_value: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
