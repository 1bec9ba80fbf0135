//! # 凭证校验接口

use async_trait::async_trait;

use crate::error::Result;

/// 凭证校验
///
/// 存储失败必须返回 `Err`，不能当作校验通过
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// 凭证是否有效
    async fn validate(&self, api_key: &str) -> Result<bool>;
}

/// 调用计量
#[async_trait]
pub trait UsageMeter: Send + Sync {
    /// 记录一次已授权的调用
    async fn record_usage(&self, api_key: &str) -> Result<()>;
}
