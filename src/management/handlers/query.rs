//! # 题目查询接口
//!
//! `GET /api/query`，响应沿用答题脚本约定的 `{code, msg, data}` 结构

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::HashMap;

use crate::auth::AuthUtils;
use crate::error::{BankError, ErrorCategory};
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::RequestId;
use crate::management::server::AppState;
use crate::providers::QuestionQuery;
use crate::resolver::{AnswerSource, ResolveRequest};
use crate::{lerror, linfo, lwarn};

/// 成功时的提示信息
pub const SUCCESS_MESSAGE: &str = "获取成功";

/// 查询接口响应
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnswerData>,
}

/// 答案载荷
#[derive(Debug, Serialize)]
pub struct AnswerData {
    pub data: String,
}

impl QueryResponse {
    #[must_use]
    pub fn answer(answer: String) -> Self {
        Self {
            code: 0,
            msg: SUCCESS_MESSAGE.to_string(),
            data: Some(AnswerData { data: answer }),
        }
    }

    #[must_use]
    pub fn failure(message: String) -> Self {
        Self {
            code: 1,
            msg: message,
            data: None,
        }
    }
}

/// 查询题目答案
pub async fn query_answer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let credential = AuthUtils::extract_api_key(&headers, &params);
    let param = |name: &str| params.get(name).cloned().unwrap_or_default();
    let query = QuestionQuery::new(param("title").trim(), param("options"), param("type"));

    let request = ResolveRequest {
        request_id: request_id.to_string(),
        credential,
        query,
    };

    match state.resolver.resolve(request).await {
        Ok(resolved) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Server,
                "answer_returned",
                "返回答案",
                from_cache = resolved.source == AnswerSource::Cache
            );
            (StatusCode::OK, Json(QueryResponse::answer(resolved.answer))).into_response()
        }
        Err(err) => failure(&request_id, &err),
    }
}

fn failure(request_id: &RequestId, err: &BankError) -> Response {
    let (status, _) = err.to_http_response_parts();
    match err.category() {
        ErrorCategory::Client => lwarn!(
            request_id,
            LogStage::Response,
            LogComponent::Server,
            "query_rejected",
            "查询请求被拒绝",
            status = status.as_u16(),
            error = err.to_string()
        ),
        ErrorCategory::Server => lerror!(
            request_id,
            LogStage::Error,
            LogComponent::Server,
            "query_failed",
            "查询请求失败",
            status = status.as_u16(),
            error = err.to_string()
        ),
    }
    (status, Json(QueryResponse::failure(err.client_message()))).into_response()
}
