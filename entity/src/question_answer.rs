//! # 题目答案实体定义
//!
//! 题目缓存表的 Sea-ORM 实体模型，`question` 是唯一业务键

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 题目答案实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "question_answer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "Text")]
    pub question: String,
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,
    #[sea_orm(column_name = "type", nullable)]
    pub question_type: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
