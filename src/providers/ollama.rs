//! # Ollama 适配器
//!
//! 本地推理服务，单次非流式 `/api/chat` 调用，无需认证

use serde::{Deserialize, Serialize};

use super::traits::ProviderAdapter;
use super::types::{
    AuthScheme, MAX_OUTPUT_TOKENS, Platform, ProviderCredential, ProviderRequest, TEMPERATURE,
    TOP_P,
};
use crate::error::{ProviderError, ProviderResult};

const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/chat";

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: [OllamaMessage<'a>; 1],
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
    top_p: f64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaReply>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

/// Ollama 适配器
#[derive(Debug, Clone, Copy, Default)]
pub struct OllamaAdapter;

impl ProviderAdapter for OllamaAdapter {
    fn platform(&self) -> Platform {
        Platform::Ollama
    }

    fn default_endpoint(&self) -> &'static str {
        DEFAULT_ENDPOINT
    }

    fn build_request(
        &self,
        prompt: &str,
        credential: &ProviderCredential,
    ) -> ProviderResult<ProviderRequest> {
        let body = OllamaRequest {
            model: &credential.model,
            messages: [OllamaMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            format: "json",
            options: OllamaOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: MAX_OUTPUT_TOKENS,
            },
        };

        let body = serde_json::to_value(&body).map_err(|e| ProviderError::InvalidRequest {
            platform: Platform::Ollama,
            message: e.to_string(),
        })?;

        Ok(ProviderRequest {
            url: credential
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            auth: AuthScheme::None,
            headers: Vec::new(),
            body,
        })
    }

    fn extract_answer(&self, body: &str) -> ProviderResult<String> {
        let response: OllamaResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::malformed(Platform::Ollama, e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ProviderError::malformed(Platform::Ollama, error));
        }

        let message = response
            .message
            .ok_or_else(|| ProviderError::malformed(Platform::Ollama, "缺少 message 字段"))?;

        if message.content.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion {
                platform: Platform::Ollama,
            });
        }
        Ok(message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn builds_single_shot_request_without_auth() {
        let credential = ProviderCredential {
            api_key: None,
            model: "llama3".to_string(),
            base_url: None,
        };

        let request = OllamaAdapter.build_request("PROMPT", &credential).unwrap();

        assert_eq!(request.url, DEFAULT_ENDPOINT);
        assert_eq!(request.auth, AuthScheme::None);
        assert_eq!(
            request.body,
            json!({
                "model": "llama3",
                "messages": [{"role": "user", "content": "PROMPT"}],
                "stream": false,
                "format": "json",
                "options": {"temperature": 0.05, "top_p": 0.95, "num_predict": 256}
            })
        );
    }

    #[test]
    fn sampling_options_serialize_exactly() {
        let credential = ProviderCredential {
            model: "llama3".to_string(),
            ..ProviderCredential::default()
        };
        let request = OllamaAdapter.build_request("PROMPT", &credential).unwrap();

        let options = &request.body["options"];
        assert_eq!(serde_json::to_string(&options["temperature"]).unwrap(), "0.05");
        assert_eq!(serde_json::to_string(&options["top_p"]).unwrap(), "0.95");
    }

    #[test]
    fn extracts_message_content() {
        let body = r#"{"model":"llama3","message":{"role":"assistant","content":"{\"answer\":\"对\"}"},"done":true}"#;
        assert_eq!(OllamaAdapter.extract_answer(body).unwrap(), "{\"answer\":\"对\"}");
    }

    #[test]
    fn error_body_is_malformed() {
        let err = OllamaAdapter
            .extract_answer(r#"{"error":"model 'llama3' not found"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::MalformedResponse);
        assert!(err.to_string().contains("not found"));
    }
}
