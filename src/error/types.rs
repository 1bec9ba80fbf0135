//! # 错误类型定义

use axum::http::StatusCode;
use thiserror::Error;

use super::ErrorCategory;
use super::provider::ProviderError;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum BankError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 请求参数错误
    #[error("参数错误: {message}")]
    InvalidInput { message: String },

    /// 请求未携带 API 密钥
    #[error("缺少API密钥")]
    MissingCredential,

    /// API 密钥不存在或不匹配
    #[error("无效的API密钥")]
    InvalidCredential,

    /// AI 服务商调用失败
    #[error("AI模型调用失败: {source}")]
    Provider {
        #[from]
        source: ProviderError,
    },

    /// 业务规则拒绝
    #[error("业务错误: {message}")]
    Business { message: String },

    /// 资源不存在
    #[error("资源不存在: {message}")]
    NotFound { message: String },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 附加了上下文的错误
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<BankError>,
    },
}

impl BankError {
    /// 转换为HTTP响应状态码与错误码
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_API_KEY"),
            Self::InvalidCredential => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
            Self::Provider { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR"),
            Self::Business { .. } => (StatusCode::BAD_REQUEST, "BUSINESS_ERROR"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Self::Serialization { .. } => (StatusCode::BAD_REQUEST, "SERIALIZATION_ERROR"),
            Self::Context { source, .. } => source.to_http_response_parts(),
        }
    }

    /// 错误归属（客户端/服务端），用于决定日志级别
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        if self.to_http_response_parts().0.is_client_error() {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        }
    }

    /// 可以直接返回给调用方的错误信息
    ///
    /// 服务端内部细节（数据库、IO 等）统一折叠为 `服务器内部错误`
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidInput { message }
            | Self::Business { message }
            | Self::NotFound { message } => message.clone(),
            Self::MissingCredential | Self::InvalidCredential | Self::Provider { .. } => {
                self.to_string()
            }
            Self::Context { source, .. } => source.client_message(),
            _ => "服务器内部错误".to_string(),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建参数错误
    pub fn invalid_input<T: Into<String>>(message: T) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建业务错误
    pub fn business<T: Into<String>>(message: T) -> Self {
        Self::Business {
            message: message.into(),
        }
    }

    /// 创建资源不存在错误
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for BankError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON处理失败".to_string(),
            source: err.into(),
        }
    }
}

impl From<sea_orm::error::DbErr> for BankError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::database_with_source("数据库操作失败", err)
    }
}

impl From<bcrypt::BcryptError> for BankError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal_with_source("密码哈希处理失败", err)
    }
}

impl From<tokio::task::JoinError> for BankError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal_with_source("后台任务执行失败", err)
    }
}
