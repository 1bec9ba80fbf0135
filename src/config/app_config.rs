//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::{DatabaseConfig, ProviderConfig};
use crate::ensure_config;
use crate::error::{BankError, Result};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// AI 服务商配置
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 访问凭证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 管理接口配置
    #[serde(default)]
    pub admin: AdminConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// 解析监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                BankError::config_with_source(
                    format!("无效的监听地址: {}:{}", self.host, self.port),
                    e,
                )
            })
    }
}

/// 凭证校验方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// 明文密钥保存在主库 `api_keys` 表，带调用统计
    #[default]
    Database,
    /// bcrypt 哈希保存在独立身份库，逐条比对
    Hashed,
}

/// 访问凭证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 校验方式
    #[serde(default)]
    pub mode: AuthMode,
    /// 身份库 URL（仅 hashed 模式）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_database_url: Option<String>,
    /// 新登记哈希密钥的 bcrypt 成本
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

const fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            identity_database_url: None,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// 管理接口配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 管理令牌的 bcrypt 哈希，未配置时不挂载管理接口
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_hash: Option<String>,
}

impl AdminConfig {
    /// 是否启用管理接口
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.token_hash.as_deref().is_some_and(|hash| !hash.is_empty())
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.server.port != 0, "无效的服务器端口: 0");
        ensure_config!(!self.server.host.is_empty(), "监听地址不能为空");
        ensure_config!(!self.database.url.is_empty(), "数据库URL不能为空");
        ensure_config!(self.database.max_connections > 0, "数据库最大连接数必须大于0");

        self.provider.validate()?;

        if self.auth.mode == AuthMode::Hashed
            && self
                .auth
                .identity_database_url
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(BankError::config(
                "auth.mode = \"hashed\" 时必须配置 auth.identity_database_url",
            ));
        }

        ensure_config!(
            (4..=31).contains(&self.auth.bcrypt_cost),
            "auth.bcrypt_cost 必须在 4 到 31 之间: {}",
            self.auth.bcrypt_cost
        );

        Ok(())
    }
}
