//! API密钥管理

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::management::{response, server::AppState};

/// 未填写描述时身份库中使用的名称
const UNNAMED_KEY: &str = "未命名密钥";

/// 创建密钥请求
#[derive(Debug, Default, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// 列出全部密钥及调用统计
pub async fn list_api_keys(State(state): State<AppState>) -> axum::response::Response {
    match state.vault.list().await {
        Ok(keys) => response::success(keys),
        Err(err) => response::app_error(err),
    }
}

/// 创建新密钥
///
/// hashed 模式下登记到身份库，响应中的明文密钥只出现这一次
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(request): Json<CreateKeyRequest>,
) -> axum::response::Response {
    if let Some(identity) = &state.identity {
        let name = request
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_KEY.to_string());
        return match identity.register(&name).await {
            Ok(registered) => response::success_with_message(registered, "创建成功"),
            Err(err) => response::app_error(err),
        };
    }

    match state.vault.create(request.description).await {
        Ok(record) => response::success_with_message(record, "创建成功"),
        Err(err) => response::app_error(err),
    }
}

/// 删除密钥（不能删除最后一个）
pub async fn delete_api_key(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    match state.vault.delete(id).await {
        Ok(()) => response::success_without_data("删除成功"),
        Err(err) => response::app_error(err),
    }
}
