//! # 答案题库服务库
//!
//! 题目答案的缓存查询：API密钥校验、答案缓存、多平台 AI 服务商适配与编排

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
pub mod providers;
pub mod resolver;
pub mod types;

pub use config::AppConfig;
pub use error::{BankError, Result};
