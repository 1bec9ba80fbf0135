//! # bcrypt 身份库
//!
//! 独立身份库中只保存密钥的 bcrypt 哈希，校验时逐条比对。
//! 每次比对都是一次完整的 bcrypt 计算，耗时随存量线性增长，
//! 只适合密钥数量很少的部署

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use entity::hashed_api_keys::{self, Entity as HashedApiKeys};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde::Serialize;
use std::sync::Arc;
use tokio::task;

use super::api_key::generate_api_key;
use super::traits::CredentialValidator;
use crate::error::Result;
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo};

/// 新登记的哈希密钥，`api_key` 为明文且不会再次出现
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredKey {
    pub id: i32,
    pub name: String,
    pub api_key: String,
    pub created_at: NaiveDateTime,
}

/// bcrypt 身份库
#[derive(Clone)]
pub struct BcryptKeyStore {
    db: Arc<DatabaseConnection>,
    cost: u32,
}

impl BcryptKeyStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_cost(db, bcrypt::DEFAULT_COST)
    }

    /// 指定哈希成本（测试中使用较低成本）
    #[must_use]
    pub const fn with_cost(db: Arc<DatabaseConnection>, cost: u32) -> Self {
        Self { db, cost }
    }

    /// 生成新密钥并保存其哈希，明文只在此处返回一次
    pub async fn register(&self, name: &str) -> Result<RegisteredKey> {
        let api_key = generate_api_key()?;
        let cost = self.cost;
        let to_hash = api_key.clone();
        let hashed = task::spawn_blocking(move || bcrypt::hash(to_hash, cost)).await??;

        let model = hashed_api_keys::ActiveModel {
            name: Set(name.to_string()),
            key_value: Set(hashed),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        linfo!(
            "system",
            LogStage::Admin,
            LogComponent::IdentityStore,
            "hashed_key_registered",
            "登记哈希密钥",
            id = model.id,
            name = name
        );
        Ok(RegisteredKey {
            id: model.id,
            name: model.name,
            api_key,
            created_at: model.created_at,
        })
    }

    /// 已登记的哈希数量
    pub async fn count(&self) -> Result<u64> {
        Ok(HashedApiKeys::find().count(self.db.as_ref()).await?)
    }
}

#[async_trait]
impl CredentialValidator for BcryptKeyStore {
    async fn validate(&self, api_key: &str) -> Result<bool> {
        let hashes: Vec<String> = HashedApiKeys::find()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|model| model.key_value)
            .collect();

        ldebug!(
            "system",
            LogStage::Authentication,
            LogComponent::IdentityStore,
            "bcrypt_scan",
            "逐条比对哈希密钥",
            candidates = hashes.len()
        );

        let api_key = api_key.to_string();
        // 无法解析的哈希按不匹配处理
        let matched = task::spawn_blocking(move || {
            hashes
                .iter()
                .any(|hash| bcrypt::verify(&api_key, hash).unwrap_or(false))
        })
        .await?;

        Ok(matched)
    }
}
