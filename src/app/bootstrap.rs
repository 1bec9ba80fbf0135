//! # 启动装配
//!
//! 连接数据库、执行迁移、准备默认密钥，并按认证模式组装解析器

use std::sync::Arc;

use crate::auth::{
    ApiKeyVault, BcryptKeyStore, CredentialValidator, api_key::DEFAULT_KEY_DESCRIPTION,
};
use crate::cache::SeaOrmAnswerStore;
use crate::config::{AppConfig, AuthMode, DatabaseConfig};
use crate::database::connect_and_migrate;
use crate::error::{BankError, Context, Result};
use crate::logging::{LogComponent, LogStage};
use crate::providers::{AnswerProvider, ProviderRegistry};
use crate::resolver::AnswerResolver;
use crate::linfo;

use super::context::AppContext;

/// 使用内置服务商注册表构建上下文
pub async fn build_context(config: AppConfig) -> Result<AppContext> {
    let registry = ProviderRegistry::new(config.provider.clone())?;
    build_context_with_provider(config, Arc::new(registry)).await
}

/// 使用指定的服务商实现构建上下文
pub async fn build_context_with_provider(
    config: AppConfig,
    provider: Arc<dyn AnswerProvider>,
) -> Result<AppContext> {
    config.validate()?;

    let db = Arc::new(
        connect_and_migrate(&config.database)
            .await
            .context("主库初始化失败")?,
    );
    let answers = Arc::new(SeaOrmAnswerStore::new(Arc::clone(&db)));
    let vault = Arc::new(ApiKeyVault::new(Arc::clone(&db)));

    let platform = config.provider.platform();
    let identity = match config.auth.mode {
        AuthMode::Database => {
            ensure_default_vault_key(&vault).await?;
            None
        }
        AuthMode::Hashed => {
            let store = open_identity_store(&config).await?;
            ensure_default_identity_key(&store).await?;
            Some(store)
        }
    };
    let validator: Arc<dyn CredentialValidator> = match &identity {
        Some(store) => store.clone(),
        None => vault.clone(),
    };

    let mut resolver = AnswerResolver::new(
        validator,
        answers.clone(),
        Arc::clone(&provider),
        platform,
    );
    if config.auth.mode == AuthMode::Database {
        resolver = resolver.with_usage_meter(vault.clone());
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "context_ready",
        "应用上下文初始化完成",
        platform = platform.as_str(),
        auth_mode = config.auth.mode
    );

    Ok(AppContext {
        config: Arc::new(config),
        db,
        answers,
        vault,
        identity,
        provider,
        resolver: Arc::new(resolver),
    })
}

/// 连接 hashed 模式的身份库
pub async fn open_identity_store(config: &AppConfig) -> Result<Arc<BcryptKeyStore>> {
    let url = config
        .auth
        .identity_database_url
        .clone()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| BankError::config("hashed 模式需要配置 identity_database_url"))?;
    let identity_db = connect_and_migrate(&DatabaseConfig::with_url(url))
        .await
        .context("身份库初始化失败")?;
    Ok(Arc::new(BcryptKeyStore::with_cost(
        Arc::new(identity_db),
        config.auth.bcrypt_cost,
    )))
}

async fn ensure_default_vault_key(vault: &ApiKeyVault) -> Result<()> {
    if let Some(record) = vault.ensure_default_key().await? {
        // 首次启动时只在这里输出一次完整密钥
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ApiKey,
            "default_key_created",
            format!("已创建默认API密钥: {}", record.key_value)
        );
    }
    Ok(())
}

/// 身份库为空时登记一个默认哈希密钥，明文只在日志中出现一次
async fn ensure_default_identity_key(store: &BcryptKeyStore) -> Result<()> {
    if store.count().await? > 0 {
        return Ok(());
    }
    let registered = store.register(DEFAULT_KEY_DESCRIPTION).await?;
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::IdentityStore,
        "default_key_created",
        format!("已创建默认API密钥: {}", registered.api_key),
        id = registered.id
    );
    Ok(())
}
