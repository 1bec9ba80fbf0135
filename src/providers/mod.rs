//! # AI服务提供商适配器模块
//!
//! 七个平台的线协议适配，通过 `ProviderRegistry` 统一调度

pub mod chat_completions;
pub mod gemini;
pub mod ollama;
pub mod prompt;
pub mod registry;
pub mod traits;
pub mod types;

pub use chat_completions::ChatCompletionsAdapter;
pub use gemini::GeminiAdapter;
pub use ollama::OllamaAdapter;
pub use prompt::build_prompt;
pub use registry::ProviderRegistry;
pub use traits::{AnswerProvider, ProviderAdapter};
pub use types::{AuthScheme, Platform, ProviderCredential, ProviderRequest, QuestionQuery};
