//! 健康检查

use axum::Json;
use serde_json::{Value, json};

/// 进程存活即返回 ok
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
