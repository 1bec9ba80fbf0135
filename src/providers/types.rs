//! # 服务商通用类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::BankError;

/// 单次调用最多生成的 token 数
pub const MAX_OUTPUT_TOKENS: u32 = 256;
/// 采样温度
pub const TEMPERATURE: f64 = 0.05;
/// nucleus 采样阈值
pub const TOP_P: f64 = 0.95;
/// 每次只要一个候选答案
pub const COMPLETION_COUNT: u32 = 1;

/// 支持的 AI 平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// 硅基流动
    Siliconflow,
    /// 阿里云百炼（DashScope 兼容模式）
    Aliyun,
    /// 智谱
    Zhipu,
    /// 本地 Ollama
    Ollama,
    /// DeepSeek
    Deepseek,
    /// OpenAI ChatGPT
    Chatgpt,
    /// Google Gemini
    Gemini,
}

impl Platform {
    /// 全部平台
    pub const ALL: [Self; 7] = [
        Self::Siliconflow,
        Self::Aliyun,
        Self::Zhipu,
        Self::Ollama,
        Self::Deepseek,
        Self::Chatgpt,
        Self::Gemini,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Siliconflow => "siliconflow",
            Self::Aliyun => "aliyun",
            Self::Zhipu => "zhipu",
            Self::Ollama => "ollama",
            Self::Deepseek => "deepseek",
            Self::Chatgpt => "chatgpt",
            Self::Gemini => "gemini",
        }
    }

    /// 未配置模型时使用的默认模型
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Siliconflow => "deepseek-ai/DeepSeek-R1",
            Self::Aliyun => "qwen-plus",
            Self::Zhipu => "glm-4",
            Self::Ollama => "llama3",
            Self::Deepseek => "deepseek-chat",
            Self::Chatgpt => "gpt-3.5-turbo",
            Self::Gemini => "gemini-pro",
        }
    }

    /// 严格解析平台名（忽略大小写与首尾空白）
    pub fn parse(name: &str) -> Result<Self, BankError> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == normalized)
            .ok_or_else(|| BankError::config(format!("未知的服务商: {name}")))
    }

    /// 宽松解析：未知或为空时回退到 siliconflow
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|_| {
            if !name.trim().is_empty() {
                warn!(platform = name, "未知的服务商，回退到 siliconflow");
            }
            Self::Siliconflow
        })
    }
}

impl FromStr for Platform {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 规范化后的题目查询
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionQuery {
    /// 题目文本
    pub title: String,
    /// 选项文本，可为空
    #[serde(default)]
    pub options: String,
    /// 题型，可为空
    #[serde(default, rename = "type")]
    pub question_type: String,
}

impl QuestionQuery {
    pub fn new(
        title: impl Into<String>,
        options: impl Into<String>,
        question_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            options: options.into(),
            question_type: question_type.into(),
        }
    }
}

/// 调用某个平台所需的凭证与模型
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCredential {
    /// 平台 API 密钥（Ollama 不需要）
    pub api_key: Option<String>,
    /// 模型标识
    pub model: String,
    /// 接口地址覆盖
    pub base_url: Option<String>,
}

/// 认证方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// 通过查询参数传递密钥
    QueryParam { name: &'static str, value: String },
    /// 无需认证
    None,
}

/// 适配器构造出的 HTTP 请求
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// 完整请求地址
    pub url: String,
    /// 认证方式
    pub auth: AuthScheme,
    /// 额外请求头
    pub headers: Vec<(&'static str, String)>,
    /// JSON 请求体
    pub body: serde_json::Value,
}
