//! 应用上下文
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use crate::auth::{ApiKeyVault, BcryptKeyStore};
use crate::cache::SeaOrmAnswerStore;
use crate::config::AppConfig;
use crate::providers::AnswerProvider;
use crate::resolver::AnswerResolver;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub answers: Arc<SeaOrmAnswerStore>,
    pub vault: Arc<ApiKeyVault>,
    /// hashed 模式下的身份库
    pub identity: Option<Arc<BcryptKeyStore>>,
    pub provider: Arc<dyn AnswerProvider>,
    pub resolver: Arc<AnswerResolver>,
}
