//! # 配置管理器
//!
//! 配置文件定位、加载与环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{AppConfig, AuthMode};
use crate::error::{BankError, Result};
use crate::providers::Platform;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ANSWER_BANK_";

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "ANSWER_BANK_CONFIG_PATH";

/// 配置管理器
pub struct ConfigManager {
    /// 当前配置
    config: AppConfig,
    /// 配置文件路径
    source_path: PathBuf,
    /// 环境变量覆盖映射
    env_overrides: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 路径优先级：显式路径 > `ANSWER_BANK_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`
    pub fn new(explicit_path: Option<&Path>) -> Result<Self> {
        let config_file = Self::resolve_config_path(explicit_path);
        Self::from_file_with_overrides(&config_file, Self::build_env_overrides(env::vars()))
    }

    /// 定位配置文件
    #[must_use]
    pub fn resolve_config_path(explicit_path: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit_path {
            return path.to_path_buf();
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        PathBuf::from(format!("config/config.{env}.toml"))
    }

    /// 从指定文件创建配置管理器，并应用给定的覆盖项
    pub fn from_file_with_overrides(
        config_path: impl AsRef<Path>,
        env_overrides: HashMap<String, String>,
    ) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = Self::load_config_file(config_path)?;

        Self::apply_env_overrides(&mut config, &env_overrides)?;
        config.validate()?;

        info!(
            path = %config_path.display(),
            overrides = env_overrides.len(),
            platform = %config.provider.platform(),
            "配置加载完成"
        );

        Ok(Self {
            config,
            source_path: config_path.to_path_buf(),
            env_overrides,
        })
    }

    /// 获取当前配置
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 取出配置
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// 配置文件路径
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// 已应用的覆盖项数量
    #[must_use]
    pub fn override_count(&self) -> usize {
        self.env_overrides.len()
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(BankError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            BankError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            BankError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// 例如: `ANSWER_BANK_SERVER_PORT` -> `server.port`
    pub fn build_env_overrides<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: HashMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key != CONFIG_PATH_ENV)
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|config_key| (config_key.to_lowercase().replace('_', "."), value))
            })
            .collect();

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!(
                "应用环境变量覆盖: {} = {}",
                path,
                if path.contains("key") || path.contains("hash") {
                    "***"
                } else {
                    value
                }
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        value
            .parse()
            .map_err(|e| BankError::config_with_source(format!("无效的{what}: {value}"), e))
    }

    /// 将环境变量覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = Self::parse_number(value, "端口号")?,
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = Self::parse_number(value, "最大连接数")?;
            }
            ["database", "connect", "timeout"] => {
                config.database.connect_timeout = Self::parse_number(value, "连接超时")?;
            }
            ["provider", "platform"] => config.provider.platform = value.to_string(),
            ["provider", "timeout", "seconds"] => {
                config.provider.timeout_seconds = Self::parse_number(value, "服务商超时")?;
            }
            ["auth", "mode"] => {
                config.auth.mode = match value.to_ascii_lowercase().as_str() {
                    "database" => AuthMode::Database,
                    "hashed" => AuthMode::Hashed,
                    other => {
                        return Err(BankError::config(format!("无效的认证方式: {other}")));
                    }
                };
            }
            ["auth", "identity", "database", "url"] => {
                config.auth.identity_database_url = Some(value.to_string());
            }
            ["auth", "bcrypt", "cost"] => {
                config.auth.bcrypt_cost = Self::parse_number(value, "bcrypt成本")?;
            }
            ["admin", "token", "hash"] => config.admin.token_hash = Some(value.to_string()),
            [platform, rest @ ..] if platform.parse::<Platform>().is_ok() => {
                let platform = platform.parse::<Platform>()?;
                match rest {
                    ["api", "key"] => config.provider.set_api_key(platform, value),
                    ["model"] => config.provider.set_model(platform, value),
                    ["base", "url"] => config.provider.set_base_url(platform, value),
                    _ => warn!("未知的配置路径，忽略环境变量覆盖: {}", path),
                }
            }
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_env_override_paths() {
        let overrides = ConfigManager::build_env_overrides(vars(&[
            ("ANSWER_BANK_SERVER_PORT", "9000"),
            ("ANSWER_BANK_CONFIG_PATH", "/etc/answer-bank.toml"),
            ("UNRELATED", "x"),
        ]));

        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("server.port").map(String::as_str), Some("9000"));
    }

    #[test]
    fn test_overrides_applied_after_file() {
        let file = write_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [database]
            url = "sqlite::memory:"

            [provider]
            platform = "siliconflow"
            "#,
        );

        let overrides = ConfigManager::build_env_overrides(vars(&[
            ("ANSWER_BANK_SERVER_PORT", "9100"),
            ("ANSWER_BANK_PROVIDER_PLATFORM", "zhipu"),
            ("ANSWER_BANK_ZHIPU_API_KEY", "zp-secret"),
            ("ANSWER_BANK_ZHIPU_MODEL", "glm-4-flash"),
            ("ANSWER_BANK_NOT_A_SETTING", "ignored"),
        ]));
        let manager = ConfigManager::from_file_with_overrides(file.path(), overrides).unwrap();
        let config = manager.config();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.provider.platform(), Platform::Zhipu);
        assert_eq!(config.provider.api_key(Platform::Zhipu), Some("zp-secret"));
        assert_eq!(config.provider.model(Platform::Zhipu), "glm-4-flash");
        assert_eq!(manager.override_count(), 5);
    }

    #[test]
    fn test_invalid_numeric_override_is_config_error() {
        let file = write_config("[database]\nurl = \"sqlite::memory:\"\n");
        let overrides =
            ConfigManager::build_env_overrides(vars(&[("ANSWER_BANK_SERVER_PORT", "eighty")]));

        let err = ConfigManager::from_file_with_overrides(file.path(), overrides)
            .err()
            .unwrap();
        assert!(matches!(err, BankError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigManager::from_file_with_overrides("/nonexistent/answer-bank.toml", HashMap::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("配置文件不存在"));
    }
}
