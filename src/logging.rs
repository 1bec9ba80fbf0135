//! # 日志配置模块
//!
//! 日志系统初始化，以及带请求 ID / 阶段 / 组件字段的结构化日志宏

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt};

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 服务启动
    Startup,
    /// 配置加载
    Configuration,
    /// 凭证校验
    Authentication,
    /// 缓存读取
    CacheLookup,
    /// 缓存写入
    CacheWrite,
    /// 调用 AI 服务商
    Upstream,
    /// 响应返回
    Response,
    /// 管理接口操作
    Admin,
    /// 内部处理
    Internal,
    /// 出错
    Error,
    /// 服务关闭
    Shutdown,
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::CacheLookup => "cache_lookup",
            Self::CacheWrite => "cache_write",
            Self::Upstream => "upstream",
            Self::Response => "response",
            Self::Admin => "admin",
            Self::Internal => "internal",
            Self::Error => "error",
            Self::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 启动入口
    Main,
    /// 配置管理
    Config,
    /// 数据库
    Database,
    /// 答案缓存
    AnswerStore,
    /// API 密钥库
    ApiKey,
    /// bcrypt 身份库
    IdentityStore,
    /// AI 服务商适配层
    Provider,
    /// 答案解析流程
    Resolver,
    /// HTTP 服务
    Server,
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::AnswerStore => "answer_store",
            Self::ApiKey => "api_key",
            Self::IdentityStore => "identity_store",
            Self::Provider => "provider",
            Self::Resolver => "resolver",
            Self::Server => "server",
        };
        f.write_str(name)
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bank_log_event {
    ($level:expr, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        ::tracing::event!(
            $level,
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($key = ?$value,)*
            "{}",
            $message
        )
    };
}

/// 结构化 info 日志
#[macro_export]
macro_rules! linfo {
    ($($arg:tt)+) => {
        $crate::__bank_log_event!(::tracing::Level::INFO, $($arg)+)
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($($arg:tt)+) => {
        $crate::__bank_log_event!(::tracing::Level::WARN, $($arg)+)
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($($arg:tt)+) => {
        $crate::__bank_log_event!(::tracing::Level::ERROR, $($arg)+)
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($($arg:tt)+) => {
        $crate::__bank_log_event!(::tracing::Level::DEBUG, $($arg)+)
    };
}

/// 脱敏显示密钥，只保留前 6 个字符
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    if secret.chars().count() <= 6 {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}

/// 初始化日志系统
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    // 默认配置：关闭数据库查询的详细日志
    let default_filter = format!(
        "{level},answer_bank=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn"
    );

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            fmt_layer::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if env::var("RUST_LOG").is_ok_and(|v| v.contains("sqlx::query=info") || v.contains("sqlx::query=debug")) {
        tracing::info!("SQLx database query logging enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-1234567890"), "sk-123***");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(LogStage::CacheLookup.to_string(), "cache_lookup");
        assert_eq!(LogComponent::IdentityStore.to_string(), "identity_store");
    }

    #[test]
    fn test_macros_expand_outside_subscriber() {
        let request_id = "req-1";
        linfo!(
            request_id,
            LogStage::Internal,
            LogComponent::Resolver,
            "macro_smoke",
            "日志宏可以在没有订阅者时调用",
            attempt = 1,
            platform = Some("zhipu")
        );
        lwarn!(request_id, LogStage::Error, LogComponent::Provider, "macro_smoke", "warn");
    }
}
