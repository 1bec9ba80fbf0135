//! 统计与服务商测试

use axum::{
    Extension,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::config::AuthMode;
use crate::error::BankError;
use crate::management::middleware::RequestId;
use crate::management::{response, server::AppState};
use crate::providers::{Platform, QuestionQuery};

/// 系统统计
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_questions: u64,
    pub last_updated: Option<chrono::NaiveDateTime>,
    pub total_api_keys: u64,
    pub platform: Platform,
    pub auth_mode: AuthMode,
}

/// 服务商测试参数
#[derive(Debug, Default, Deserialize)]
pub struct TestAnswerQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: String,
    #[serde(default, rename = "type")]
    pub question_type: String,
}

/// 服务商测试结果
#[derive(Debug, Serialize)]
pub struct TestAnswerResult {
    pub answer: String,
    pub platform: Platform,
}

/// 题库与密钥统计
pub async fn get_stats(State(state): State<AppState>) -> axum::response::Response {
    let stats = match state.answers.stats().await {
        Ok(stats) => stats,
        Err(err) => return response::app_error(err),
    };
    let total_api_keys = match state.vault.count().await {
        Ok(count) => count,
        Err(err) => return response::app_error(err),
    };

    response::success(SystemStats {
        total_questions: stats.total_questions,
        last_updated: stats.last_updated,
        total_api_keys,
        platform: state.resolver.platform(),
        auth_mode: state.config.auth.mode,
    })
}

/// 直接调用服务商，不读写缓存
pub async fn test_answer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<TestAnswerQuery>,
) -> axum::response::Response {
    let title = query.title.trim();
    if title.is_empty() {
        return response::app_error(BankError::invalid_input("题目不能为空"));
    }

    let question = QuestionQuery::new(title, query.options, query.question_type);
    match state
        .resolver
        .ask_provider(request_id.as_str(), &question)
        .await
    {
        Ok(answer) => response::success(TestAnswerResult {
            answer,
            platform: state.resolver.platform(),
        }),
        Err(err) => response::app_error(err),
    }
}
