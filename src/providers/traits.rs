//! # 适配器特征定义
//!
//! 每个平台一个 `ProviderAdapter`，负责请求构造与答案提取；
//! HTTP 发送由注册表统一完成

use async_trait::async_trait;

use super::types::{Platform, ProviderCredential, ProviderRequest, QuestionQuery};
use crate::error::ProviderResult;

/// AI服务提供商适配器特征
pub trait ProviderAdapter: Send + Sync {
    /// 适配的平台
    fn platform(&self) -> Platform;

    /// 默认接口地址
    fn default_endpoint(&self) -> &'static str;

    /// 由提示词与凭证构造请求
    fn build_request(
        &self,
        prompt: &str,
        credential: &ProviderCredential,
    ) -> ProviderResult<ProviderRequest>;

    /// 从 200 响应体中提取答案文本
    fn extract_answer(&self, body: &str) -> ProviderResult<String>;
}

/// 答案来源：给定题目与平台，返回模型的原始答案文本
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn resolve(&self, query: &QuestionQuery, platform: Platform) -> ProviderResult<String>;
}
