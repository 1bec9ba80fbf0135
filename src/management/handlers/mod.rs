//! # 请求处理器

pub mod api_keys;
pub mod health;
pub mod query;
pub mod questions;
pub mod system;
