//! # 服务商注册表
//!
//! 平台到适配器的映射，统一负责 HTTP 发送、超时与状态码处理

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::chat_completions::ChatCompletionsAdapter;
use super::gemini::GeminiAdapter;
use super::ollama::OllamaAdapter;
use super::prompt::build_prompt;
use super::traits::{AnswerProvider, ProviderAdapter};
use super::types::{AuthScheme, Platform, ProviderCredential, ProviderRequest, QuestionQuery};
use crate::config::ProviderConfig;
use crate::error::{BankError, ProviderError, ProviderResult, Result};

/// 非 200 响应体最多保留的字符数
const ERROR_BODY_LIMIT: usize = 512;

/// 服务商注册表
pub struct ProviderRegistry {
    adapters: HashMap<Platform, Arc<dyn ProviderAdapter>>,
    config: ProviderConfig,
    http: reqwest::Client,
}

impl ProviderRegistry {
    /// 创建注册表并注册全部内置适配器
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut registry = Self::empty(config)?;
        registry.register(Arc::new(ChatCompletionsAdapter::siliconflow()));
        registry.register(Arc::new(ChatCompletionsAdapter::aliyun()));
        registry.register(Arc::new(ChatCompletionsAdapter::zhipu()));
        registry.register(Arc::new(ChatCompletionsAdapter::deepseek()));
        registry.register(Arc::new(ChatCompletionsAdapter::chatgpt()));
        registry.register(Arc::new(OllamaAdapter));
        registry.register(Arc::new(GeminiAdapter));
        Ok(registry)
    }

    /// 创建不含任何适配器的注册表
    pub fn empty(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BankError::internal_with_source("HTTP客户端创建失败", e))?;

        Ok(Self {
            adapters: HashMap::new(),
            config,
            http,
        })
    }

    /// 注册（或替换）某个平台的适配器
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    /// 已注册的平台
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|platform| self.adapters.contains_key(platform))
            .collect()
    }

    /// 查找适配器，未注册的平台回退到 siliconflow
    #[must_use]
    pub fn adapter(&self, platform: Platform) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters
            .get(&platform)
            .or_else(|| {
                warn!(platform = %platform, "平台未注册适配器，回退到 siliconflow");
                self.adapters.get(&Platform::Siliconflow)
            })
            .cloned()
    }

    /// 某个平台的调用凭证
    #[must_use]
    pub fn credential(&self, platform: Platform) -> ProviderCredential {
        ProviderCredential {
            api_key: self.config.api_key(platform).map(str::to_string),
            model: self.config.model(platform),
            base_url: self.config.base_url(platform).map(str::to_string),
        }
    }

    /// 发送请求并返回 200 响应体
    async fn send(&self, platform: Platform, request: ProviderRequest) -> ProviderResult<String> {
        let mut builder = self.http.post(&request.url).json(&request.body);
        builder = match &request.auth {
            AuthScheme::Bearer(token) => builder.bearer_auth(token),
            AuthScheme::QueryParam { name, value } => builder.query(&[(*name, value.as_str())]),
            AuthScheme::None => builder,
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(platform, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::unavailable(platform, e))?;

        if status != 200 {
            return Err(ProviderError::Status {
                platform,
                status,
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl AnswerProvider for ProviderRegistry {
    async fn resolve(&self, query: &QuestionQuery, platform: Platform) -> ProviderResult<String> {
        let adapter = self
            .adapter(platform)
            .ok_or_else(|| ProviderError::InvalidRequest {
                platform,
                message: "没有可用的适配器".to_string(),
            })?;
        let platform = adapter.platform();
        let credential = self.credential(platform);
        let request = adapter.build_request(&build_prompt(query), &credential)?;

        debug!(platform = %platform, model = %credential.model, url = %request.url, "调用AI服务商");
        let started = Instant::now();
        let result = match self.send(platform, request).await {
            Ok(body) => adapter.extract_answer(&body),
            Err(err) => Err(err),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(_) => debug!(platform = %platform, elapsed_ms, "AI服务商调用成功"),
            Err(err) => warn!(platform = %platform, elapsed_ms, error = %err, "AI服务商调用失败"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_builtin_platforms() {
        let registry = ProviderRegistry::new(ProviderConfig::default()).unwrap();
        assert_eq!(registry.platforms(), Platform::ALL.to_vec());
    }

    #[test]
    fn unregistered_platform_falls_back_to_siliconflow() {
        let mut registry = ProviderRegistry::empty(ProviderConfig::default()).unwrap();
        registry.register(Arc::new(ChatCompletionsAdapter::siliconflow()));

        let adapter = registry.adapter(Platform::Gemini).unwrap();
        assert_eq!(adapter.platform(), Platform::Siliconflow);
    }

    #[test]
    fn credential_uses_configured_values() {
        let mut config = ProviderConfig::default();
        config.set_api_key(Platform::Chatgpt, "sk-openai");
        config.set_base_url(Platform::Chatgpt, "http://localhost:1234/v1/chat/completions");
        let registry = ProviderRegistry::new(config).unwrap();

        let credential = registry.credential(Platform::Chatgpt);
        assert_eq!(credential.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(credential.model, "gpt-3.5-turbo");
        assert_eq!(
            credential.base_url.as_deref(),
            Some("http://localhost:1234/v1/chat/completions")
        );
    }
}
