//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod database;
mod manager;
mod provider_config;

pub use app_config::{AdminConfig, AppConfig, AuthConfig, AuthMode, ServerConfig};
pub use database::DatabaseConfig;
pub use manager::{CONFIG_PATH_ENV, ConfigManager, ENV_PREFIX};
pub use provider_config::ProviderConfig;

use std::path::Path;

/// 加载配置文件并应用环境变量覆盖
pub fn load_config(explicit_path: Option<&Path>) -> crate::error::Result<AppConfig> {
    ConfigManager::new(explicit_path).map(ConfigManager::into_config)
}
