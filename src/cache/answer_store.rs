//! # 答案存储
//!
//! `question_answer` 表上的读写：按题目查询、原子 upsert，以及管理端的统计/分页/搜索

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use entity::question_answer::{self, Entity as QuestionAnswer};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{BankError, Result};
use crate::providers::QuestionQuery;
use crate::types::{Page, PaginationInfo, PaginationParams};

/// 答案缓存接口
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// 查询已缓存的答案；空答案与不存在同样返回 `None`
    async fn get(&self, question: &str) -> Result<Option<String>>;

    /// 插入或覆盖答案
    async fn put(&self, record: &NewAnswer) -> Result<()>;
}

/// 待写入的答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question: String,
    pub answer: String,
    pub options: Option<String>,
    pub question_type: Option<String>,
}

impl NewAnswer {
    /// 由查询与答案构造，空的选项/题型存为 NULL
    #[must_use]
    pub fn from_query(query: &QuestionQuery, answer: impl Into<String>) -> Self {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            question: query.title.clone(),
            answer: answer.into(),
            options: non_empty(&query.options),
            question_type: non_empty(&query.question_type),
        }
    }
}

/// 管理端展示的题目记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub options: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<question_answer::Model> for QuestionRecord {
    fn from(model: question_answer::Model) -> Self {
        Self {
            id: model.id,
            question: model.question,
            answer: model.answer,
            options: model.options,
            question_type: model.question_type,
            created_at: model.created_at,
        }
    }
}

/// 题库统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerStats {
    pub total_questions: u64,
    pub last_updated: Option<NaiveDateTime>,
}

/// 基于 Sea-ORM 的答案存储
#[derive(Clone)]
pub struct SeaOrmAnswerStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAnswerStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 题目总数与最近写入时间
    pub async fn stats(&self) -> Result<AnswerStats> {
        let total_questions = QuestionAnswer::find().count(self.db.as_ref()).await?;
        let last_updated = QuestionAnswer::find()
            .order_by_desc(question_answer::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?
            .map(|model| model.created_at);

        Ok(AnswerStats {
            total_questions,
            last_updated,
        })
    }

    /// 按写入时间倒序分页列出题目
    pub async fn list(&self, params: PaginationParams) -> Result<Page<QuestionRecord>> {
        self.fetch_page(QuestionAnswer::find(), params).await
    }

    /// 按关键词（题目子串）搜索
    pub async fn search(
        &self,
        keyword: &str,
        params: PaginationParams,
    ) -> Result<Page<QuestionRecord>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(BankError::invalid_input("搜索关键词不能为空"));
        }

        let select =
            QuestionAnswer::find().filter(question_answer::Column::Question.contains(keyword));
        self.fetch_page(select, params).await
    }

    async fn fetch_page(
        &self,
        select: sea_orm::Select<QuestionAnswer>,
        params: PaginationParams,
    ) -> Result<Page<QuestionRecord>> {
        let paginator = select
            .order_by_desc(question_answer::Column::CreatedAt)
            .order_by_desc(question_answer::Column::Id)
            .paginate(self.db.as_ref(), params.limit);

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page - 1)
            .await?
            .into_iter()
            .map(QuestionRecord::from)
            .collect();

        Ok(Page {
            items,
            pagination: PaginationInfo::build(total, params),
        })
    }
}

#[async_trait]
impl AnswerStore for SeaOrmAnswerStore {
    async fn get(&self, question: &str) -> Result<Option<String>> {
        let found = QuestionAnswer::find()
            .filter(question_answer::Column::Question.eq(question))
            .one(self.db.as_ref())
            .await?;

        Ok(found
            .map(|model| model.answer)
            .filter(|answer| !answer.is_empty()))
    }

    async fn put(&self, record: &NewAnswer) -> Result<()> {
        let model = question_answer::ActiveModel {
            question: Set(record.question.clone()),
            answer: Set(record.answer.clone()),
            options: Set(record.options.clone()),
            question_type: Set(record.question_type.clone()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        // 单条语句完成插入或覆盖，并发写同一题目不会产生重复行
        QuestionAnswer::insert(model)
            .on_conflict(
                OnConflict::column(question_answer::Column::Question)
                    .update_column(question_answer::Column::Answer)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }
}
