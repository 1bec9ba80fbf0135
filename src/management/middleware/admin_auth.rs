//! # 管理令牌校验中间件
//!
//! 请求头 `X-Admin-Token` 与配置中的 bcrypt 哈希比对，失败返回 401

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tokio::task;

use super::request_id::RequestId;
use crate::logging::{LogComponent, LogStage};
use crate::lwarn;
use crate::management::{response, server::AppState};

/// 管理令牌头
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Axum 管理端认证中间件
pub async fn admin_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| "-".to_string(), ToString::to_string);

    let token = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (Some(token), Some(hash)) = (token, state.config.admin.token_hash.clone()) else {
        return unauthorized();
    };

    // bcrypt 比对较慢，放到阻塞线程池
    let verified = task::spawn_blocking(move || bcrypt::verify(token, &hash).unwrap_or(false))
        .await
        .unwrap_or(false);

    if !verified {
        lwarn!(
            request_id,
            LogStage::Authentication,
            LogComponent::Server,
            "admin_token_rejected",
            "管理令牌校验失败"
        );
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    response::error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "管理令牌无效")
}
