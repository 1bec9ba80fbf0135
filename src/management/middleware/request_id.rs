//! # 请求 ID 中间件
//!
//! 每个请求分配一个 UUID，写入请求扩展与 `x-request-id` 响应头。
//! 调用方已携带合法的 `x-request-id` 时沿用调用方的值

use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use std::fmt;
use uuid::Uuid;

/// 请求 ID 头
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 调用方提供的请求 ID 最大长度
const MAX_INBOUND_LEN: usize = 64;

/// 请求ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 接受调用方的请求 ID，只允许字母数字与 `-`
    #[must_use]
    pub fn from_inbound(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_INBOUND_LEN
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 请求ID中间件
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_inbound)
        .unwrap_or_else(RequestId::generate);
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}
