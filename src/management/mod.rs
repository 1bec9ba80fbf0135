//! # HTTP 服务模块
//!
//! 查询接口、管理接口与服务器启动

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use routes::create_router;
pub use server::{AppState, HttpServer};
