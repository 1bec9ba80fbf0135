//! 集成测试共享工具
#![allow(dead_code)]

use answer_bank::app::{AppContext, build_context_with_provider};
use answer_bank::config::{AppConfig, DatabaseConfig};
use answer_bank::database::connect_and_migrate;
use answer_bank::error::{ProviderError, ProviderResult};
use answer_bank::providers::{AnswerProvider, Platform, QuestionQuery};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 测试用管理令牌
pub const ADMIN_TOKEN: &str = "admin-secret";

/// 迁移完成的内存数据库
pub async fn memory_db() -> Arc<DatabaseConnection> {
    let db = connect_and_migrate(&DatabaseConfig::with_url("sqlite::memory:"))
        .await
        .expect("connect memory db");
    Arc::new(db)
}

/// 迁移完成的临时文件数据库，用于并发测试
pub async fn file_db(dir: &Path) -> Arc<DatabaseConnection> {
    let url = format!("sqlite://{}?mode=rwc", dir.join("bank.db").display());
    let db = connect_and_migrate(&DatabaseConfig::with_url(url))
        .await
        .expect("connect file db");
    Arc::new(db)
}

/// 记录调用次数的服务商替身
pub struct StubProvider {
    reply: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerProvider for StubProvider {
    async fn resolve(&self, _query: &QuestionQuery, platform: Platform) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().ok_or(ProviderError::Status {
            platform,
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

/// 内存数据库 + 管理令牌的测试配置
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::with_url("sqlite::memory:");
    config.admin.token_hash = Some(bcrypt::hash(ADMIN_TOKEN, 4).expect("hash admin token"));
    config
}

/// 使用替身服务商构建完整上下文
pub async fn test_context(provider: Arc<StubProvider>) -> AppContext {
    build_context_with_provider(test_config(), provider)
        .await
        .expect("build context")
}
