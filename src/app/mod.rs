//! # 应用装配
//!
//! 启动时构建共享上下文，以及客户端配置输出

pub mod bootstrap;
pub mod client_config;
pub mod context;

pub use bootstrap::{build_context, build_context_with_provider, open_identity_store};
pub use client_config::client_config;
pub use context::AppContext;
