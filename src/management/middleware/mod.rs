//! # 中间件

pub mod admin_auth;
pub mod request_id;

pub use admin_auth::{ADMIN_TOKEN_HEADER, admin_auth};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
