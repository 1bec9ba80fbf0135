use thiserror::Error;

use crate::providers::Platform;

/// AI 服务商调用错误
///
/// 只区分两类可观察结果：服务不可用，或响应无法解析出答案
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络失败或超时
    #[error("服务商 '{platform}' 不可用: {message}")]
    Unavailable {
        platform: Platform,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 服务商返回非 200 状态码
    #[error("服务商 '{platform}' 返回状态码 {status}: {body}")]
    Status {
        platform: Platform,
        status: u16,
        body: String,
    },

    /// 响应体不是预期结构
    #[error("服务商 '{platform}' 响应无法解析: {message}")]
    MalformedResponse { platform: Platform, message: String },

    /// 响应结构正确但答案为空
    #[error("服务商 '{platform}' 未返回答案")]
    EmptyCompletion { platform: Platform },

    /// 服务商的请求无法构造（缺少凭证等）
    #[error("服务商 '{platform}' 请求构造失败: {message}")]
    InvalidRequest { platform: Platform, message: String },
}

/// 服务商错误的粗粒度分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// 调用没有拿到可用响应
    Unavailable,
    /// 拿到了响应，但无法从中提取答案
    MalformedResponse,
}

impl ProviderError {
    /// 错误分类
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Unavailable { .. } | Self::Status { .. } | Self::InvalidRequest { .. } => {
                ProviderErrorKind::Unavailable
            }
            Self::MalformedResponse { .. } | Self::EmptyCompletion { .. } => {
                ProviderErrorKind::MalformedResponse
            }
        }
    }

    /// 出错的服务商
    #[must_use]
    pub const fn platform(&self) -> Platform {
        match self {
            Self::Unavailable { platform, .. }
            | Self::Status { platform, .. }
            | Self::MalformedResponse { platform, .. }
            | Self::EmptyCompletion { platform }
            | Self::InvalidRequest { platform, .. } => *platform,
        }
    }

    /// 创建响应解析错误
    pub fn malformed<T: Into<String>>(platform: Platform, message: T) -> Self {
        Self::MalformedResponse {
            platform,
            message: message.into(),
        }
    }

    /// 由 reqwest 错误创建不可用错误
    pub fn unavailable(platform: Platform, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "请求超时".to_string()
        } else if err.is_connect() {
            "连接失败".to_string()
        } else {
            "请求发送失败".to_string()
        };
        Self::Unavailable {
            platform,
            message,
            source: Some(err.into()),
        }
    }
}
