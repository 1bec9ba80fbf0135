//! # Google Gemini 适配器
//!
//! `models/{model}:generateContent`，密钥通过 `key` 查询参数传递

use serde::{Deserialize, Serialize};

use super::traits::ProviderAdapter;
use super::types::{
    AuthScheme, COMPLETION_COUNT, MAX_OUTPUT_TOKENS, Platform, ProviderCredential,
    ProviderRequest, TEMPERATURE, TOP_P,
};
use crate::error::{ProviderError, ProviderResult};

const DEFAULT_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: [GeminiPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
    candidate_count: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini 适配器
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl GeminiAdapter {
    fn endpoint(api_root: &str, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            api_root.trim_end_matches('/')
        )
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn platform(&self) -> Platform {
        Platform::Gemini
    }

    fn default_endpoint(&self) -> &'static str {
        DEFAULT_API_ROOT
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
                platform: Platform::Gemini,
                message: "未配置API密钥".to_string(),
            })?;

        let body = GenerateContentRequest {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                candidate_count: COMPLETION_COUNT,
                response_mime_type: "application/json",
            },
        };

        let body = serde_json::to_value(&body).map_err(|e| ProviderError::InvalidRequest {
            platform: Platform::Gemini,
            message: e.to_string(),
        })?;

        let api_root = credential.base_url.as_deref().unwrap_or(DEFAULT_API_ROOT);

        Ok(ProviderRequest {
            url: Self::endpoint(api_root, &credential.model),
            auth: AuthScheme::QueryParam {
                name: "key",
                value: api_key.to_string(),
            },
            headers: Vec::new(),
            body,
        })
    }

    fn extract_answer(&self, body: &str) -> ProviderResult<String> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::malformed(Platform::Gemini, e.to_string()))?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed(Platform::Gemini, "candidates 为空"))?
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ProviderError::malformed(Platform::Gemini, "缺少 content.parts[0].text"))?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion {
                platform: Platform::Gemini,
            });
        }
        Ok(text)
    }
}
