//! # API密钥库
//!
//! 主库中的明文密钥：签发、校验、列表、删除，以及 `api_key_usage` 中的调用计量

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use entity::{
    api_key_usage::{self, Entity as ApiKeyUsage},
    api_keys::{self, Entity as ApiKeys},
};
use rand::{RngCore, rngs::OsRng};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;

use super::traits::{CredentialValidator, UsageMeter};
use crate::error::{BankError, Result};
use crate::logging::{LogComponent, LogStage, mask_secret};
use crate::{ensure_business, linfo};

/// 密钥随机字节数（十六进制编码后 32 个字符）
pub const API_KEY_BYTES: usize = 16;

/// 首次启动自动创建的密钥描述
pub const DEFAULT_KEY_DESCRIPTION: &str = "默认API密钥";

/// 使用系统 CSPRNG 生成新密钥
pub fn generate_api_key() -> Result<String> {
    let mut bytes = [0u8; API_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| BankError::internal_with_source("生成随机密钥失败", e))?;
    Ok(hex::encode(bytes))
}

/// 带调用统计的密钥记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyRecord {
    pub id: i32,
    pub key_value: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub call_count: i64,
    pub last_used_at: Option<NaiveDateTime>,
}

impl ApiKeyRecord {
    fn from_models(key: api_keys::Model, usage: Option<api_key_usage::Model>) -> Self {
        Self {
            id: key.id,
            key_value: key.key_value,
            description: key.description,
            created_at: key.created_at,
            call_count: usage.as_ref().map_or(0, |u| u.call_count),
            last_used_at: usage.map(|u| u.last_used_at),
        }
    }
}

/// API密钥库
#[derive(Clone)]
pub struct ApiKeyVault {
    db: Arc<DatabaseConnection>,
}

impl ApiKeyVault {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn validate(&self, api_key: &str) -> Result<bool> {
        let count = ApiKeys::find()
            .filter(api_keys::Column::KeyValue.eq(api_key))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    /// 以当前时间记录一次调用
    pub async fn increment_usage(&self, api_key: &str) -> Result<()> {
        self.increment_usage_at(api_key, Utc::now().naive_utc()).await
    }

    /// 以指定时间记录一次调用
    ///
    /// 插入或自增在单条语句内完成，并发调用不会丢失计数
    pub async fn increment_usage_at(&self, api_key: &str, used_at: NaiveDateTime) -> Result<()> {
        let key = ApiKeys::find()
            .filter(api_keys::Column::KeyValue.eq(api_key))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| BankError::not_found("API密钥不存在"))?;

        let usage = api_key_usage::ActiveModel {
            api_key_id: Set(key.id),
            call_count: Set(1),
            last_used_at: Set(used_at),
            ..Default::default()
        };

        ApiKeyUsage::insert(usage)
            .on_conflict(
                OnConflict::column(api_key_usage::Column::ApiKeyId)
                    .value(
                        api_key_usage::Column::CallCount,
                        Expr::col(api_key_usage::Column::CallCount).add(1),
                    )
                    .update_column(api_key_usage::Column::LastUsedAt)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }

    /// 生成并保存新密钥
    pub async fn create(&self, description: Option<String>) -> Result<ApiKeyRecord> {
        let key_value = generate_api_key()?;
        let description = description.filter(|d| !d.trim().is_empty());

        let model = api_keys::ActiveModel {
            key_value: Set(key_value),
            description: Set(description),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        linfo!(
            "system",
            LogStage::Admin,
            LogComponent::ApiKey,
            "api_key_created",
            "创建API密钥",
            id = model.id,
            key = mask_secret(&model.key_value)
        );

        Ok(ApiKeyRecord::from_models(model, None))
    }

    /// 全部密钥及调用统计，按创建时间倒序
    pub async fn list(&self) -> Result<Vec<ApiKeyRecord>> {
        let rows = ApiKeys::find()
            .find_also_related(ApiKeyUsage)
            .order_by_desc(api_keys::Column::CreatedAt)
            .order_by_desc(api_keys::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(key, usage)| ApiKeyRecord::from_models(key, usage))
            .collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(ApiKeys::find().count(self.db.as_ref()).await?)
    }

    /// 删除密钥及其计量记录，最后一个密钥不可删除
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let total = ApiKeys::find().count(&txn).await?;
        ensure_business!(total > 1, "不能删除最后一个API密钥");

        ApiKeyUsage::delete_many()
            .filter(api_key_usage::Column::ApiKeyId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = ApiKeys::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(BankError::not_found(format!("API密钥 {id} 不存在")));
        }

        txn.commit().await?;

        linfo!(
            "system",
            LogStage::Admin,
            LogComponent::ApiKey,
            "api_key_deleted",
            "删除API密钥",
            id = id
        );
        Ok(())
    }

    /// 库为空时创建默认密钥
    pub async fn ensure_default_key(&self) -> Result<Option<ApiKeyRecord>> {
        if self.count().await? > 0 {
            return Ok(None);
        }
        let record = self
            .create(Some(DEFAULT_KEY_DESCRIPTION.to_string()))
            .await?;
        Ok(Some(record))
    }
}

#[async_trait]
impl CredentialValidator for ApiKeyVault {
    async fn validate(&self, api_key: &str) -> Result<bool> {
        Self::validate(self, api_key).await
    }
}

#[async_trait]
impl UsageMeter for ApiKeyVault {
    async fn record_usage(&self, api_key: &str) -> Result<()> {
        self.increment_usage(api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_keys_are_32_lowercase_hex() {
        let key = generate_api_key().unwrap();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_keys_are_distinct() {
        let keys: HashSet<String> = (0..10_000).map(|_| generate_api_key().unwrap()).collect();
        assert_eq!(keys.len(), 10_000);
    }
}
