//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod api_key_usage;
pub mod api_keys;
pub mod hashed_api_keys;
pub mod question_answer;

pub use api_key_usage::Entity as ApiKeyUsage;
pub use api_keys::Entity as ApiKeys;
pub use hashed_api_keys::Entity as HashedApiKeys;
pub use question_answer::Entity as QuestionAnswer;
