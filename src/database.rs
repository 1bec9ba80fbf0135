//! # 数据库模块
//!
//! 数据库连接和迁移管理

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{BankError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, linfo};

/// 初始化数据库连接
///
/// SQLite 文件数据库会先创建目录和空文件；内存数据库只使用单个连接，
/// 否则每个连接各自拥有一份独立的内存库
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    config.ensure_database_path()?;

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);
    if config.is_memory_database() {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.max_connections);
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "connect",
        "正在连接数据库",
        url = display_url(&config.url),
        max_connections = config.max_connections
    );

    let db = Database::connect(options)
        .await
        .map_err(|e| BankError::database_with_source("数据库连接失败", e))?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "connected",
        "数据库连接成功"
    );
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    let pending = ::migration::Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Database,
            "migrations_up_to_date",
            "所有迁移都已应用"
        );
        return Ok(());
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migrations_start",
        "开始运行数据库迁移",
        pending = pending.len()
    );

    ::migration::Migrator::up(db, None).await.map_err(|e| {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Database,
            "migrations_failed",
            "数据库迁移失败",
            error = e.to_string()
        );
        BankError::database_with_source("数据库迁移失败", e)
    })?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migrations_done",
        "数据库迁移完成"
    );
    Ok(())
}

/// 连接并迁移
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let db = init_database(config).await?;
    run_migrations(&db).await?;
    Ok(db)
}

/// 日志中只保留 URL 的 scheme 与路径，去掉查询参数
fn display_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn memory_database_migrates() {
        let db = connect_and_migrate(&DatabaseConfig::with_url("sqlite::memory:"))
            .await
            .unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT count(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'question_answer'",
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = connect_and_migrate(&DatabaseConfig::with_url("sqlite::memory:"))
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();
    }

    #[test]
    fn display_url_drops_query() {
        assert_eq!(
            display_url("sqlite://data/q.db?mode=rwc"),
            "sqlite://data/q.db"
        );
    }
}
