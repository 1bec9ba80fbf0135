//! # 数据库配置

use crate::error::{BankError, Result};
use crate::{
    linfo,
    logging::{LogComponent, LogStage},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库URL
    pub url: String,
    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::with_url("sqlite://./data/question_bank.db")
    }
}

impl DatabaseConfig {
    /// 使用默认连接参数构造
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }

    /// SQLite 文件路径（非 SQLite 或内存数据库返回 `None`）
    #[must_use]
    pub fn sqlite_file_path(&self) -> Option<PathBuf> {
        if !self.is_sqlite() || self.is_memory_database() {
            return None;
        }
        let without_scheme = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = without_scheme.split('?').next().unwrap_or(without_scheme);
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// 确保数据库路径存在（仅对SQLite文件数据库）
    pub fn ensure_database_path(&self) -> Result<()> {
        let Some(db_path) = self.sqlite_file_path() else {
            return Ok(());
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BankError::config_with_source(
                        format!("无法创建数据库目录: {}", parent.display()),
                        e,
                    )
                })?;

                linfo!(
                    "system",
                    LogStage::Startup,
                    LogComponent::Database,
                    "create_db_dir",
                    format!("创建数据库目录: {}", parent.display())
                );
            }
        }

        if !Path::new(&db_path).exists() {
            std::fs::File::create(&db_path).map_err(|e| {
                BankError::config_with_source(
                    format!("无法创建数据库文件: {}", db_path.display()),
                    e,
                )
            })?;
            linfo!(
                "system",
                LogStage::Startup,
                LogComponent::Database,
                "create_db_file",
                format!("创建数据库文件: {}", db_path.display())
            );
        }

        Ok(())
    }

    /// 检查是否为内存数据库
    #[must_use]
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path_strips_scheme_and_query() {
        let config = DatabaseConfig::with_url("sqlite://./data/bank.db?mode=rwc");
        assert_eq!(config.sqlite_file_path(), Some(PathBuf::from("./data/bank.db")));

        let config = DatabaseConfig::with_url("sqlite:bank.db");
        assert_eq!(config.sqlite_file_path(), Some(PathBuf::from("bank.db")));
    }

    #[test]
    fn test_memory_database_has_no_path() {
        let config = DatabaseConfig::with_url("sqlite::memory:");
        assert!(config.is_memory_database());
        assert!(config.sqlite_file_path().is_none());
        assert!(config.ensure_database_path().is_ok());
    }

    #[test]
    fn test_ensure_database_path_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_file = dir.path().join("nested").join("bank.db");
        let config = DatabaseConfig::with_url(format!("sqlite://{}", db_file.display()));

        config.ensure_database_path().unwrap();

        assert!(db_file.exists());
    }
}
