//! # Chat Completions 适配器
//!
//! siliconflow / aliyun / zhipu / deepseek / chatgpt 共用 OpenAI 兼容的
//! `/chat/completions` 线协议，差异只在地址和少量请求头

use serde::{Deserialize, Serialize};

use super::traits::ProviderAdapter;
use super::types::{
    AuthScheme, COMPLETION_COUNT, MAX_OUTPUT_TOKENS, Platform, ProviderCredential,
    ProviderRequest, TEMPERATURE, TOP_P,
};
use crate::error::{ProviderError, ProviderResult};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    n: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 兼容协议适配器
#[derive(Debug, Clone)]
pub struct ChatCompletionsAdapter {
    platform: Platform,
    endpoint: &'static str,
    extra_headers: &'static [(&'static str, &'static str)],
}

impl ChatCompletionsAdapter {
    /// 硅基流动
    #[must_use]
    pub const fn siliconflow() -> Self {
        Self {
            platform: Platform::Siliconflow,
            endpoint: "https://api.siliconflow.cn/v1/chat/completions",
            extra_headers: &[],
        }
    }

    /// 阿里云百炼兼容模式
    #[must_use]
    pub const fn aliyun() -> Self {
        Self {
            platform: Platform::Aliyun,
            endpoint: "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions",
            extra_headers: &[("X-DashScope-SSE", "enable")],
        }
    }

    /// 智谱
    #[must_use]
    pub const fn zhipu() -> Self {
        Self {
            platform: Platform::Zhipu,
            endpoint: "https://open.bigmodel.cn/api/paas/v4/chat/completions",
            extra_headers: &[],
        }
    }

    /// DeepSeek
    #[must_use]
    pub const fn deepseek() -> Self {
        Self {
            platform: Platform::Deepseek,
            endpoint: "https://api.deepseek.com/v1/chat/completions",
            extra_headers: &[],
        }
    }

    /// OpenAI
    #[must_use]
    pub const fn chatgpt() -> Self {
        Self {
            platform: Platform::Chatgpt,
            endpoint: "https://api.openai.com/v1/chat/completions",
            extra_headers: &[],
        }
    }
}

impl ProviderAdapter for ChatCompletionsAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn default_endpoint(&self) -> &'static str {
        self.endpoint
    }

    fn build_request(
        &self,
        prompt: &str,
        credential: &ProviderCredential,
    ) -> ProviderResult<ProviderRequest> {
        let api_key = credential
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::InvalidRequest {
                platform: self.platform,
                message: "未配置API密钥".to_string(),
            })?;

        let body = ChatRequest {
            model: &credential.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            n: COMPLETION_COUNT,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let body = serde_json::to_value(&body).map_err(|e| ProviderError::InvalidRequest {
            platform: self.platform,
            message: e.to_string(),
        })?;

        Ok(ProviderRequest {
            url: credential
                .base_url
                .clone()
                .unwrap_or_else(|| self.endpoint.to_string()),
            auth: AuthScheme::Bearer(api_key.to_string()),
            headers: self
                .extra_headers
                .iter()
                .map(|(name, value)| (*name, (*value).to_string()))
                .collect(),
            body,
        })
    }

    fn extract_answer(&self, body: &str) -> ProviderResult<String> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::malformed(self.platform, e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed(self.platform, "choices 为空"))?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ProviderError::EmptyCompletion {
                platform: self.platform,
            }),
        }
    }
}
