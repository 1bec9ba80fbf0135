//! 题库浏览与搜索

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::management::{response, server::AppState};
use crate::types::PaginationParams;

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 搜索参数
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 按写入时间倒序列出题目
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> axum::response::Response {
    let params = PaginationParams::new(query.page, query.limit);
    match state.answers.list(params).await {
        Ok(page) => response::paginated(page.items, page.pagination),
        Err(err) => response::app_error(err),
    }
}

/// 按关键词搜索题目
pub async fn search_questions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> axum::response::Response {
    let params = PaginationParams::new(query.page, query.limit);
    match state.answers.search(&query.keyword, params).await {
        Ok(page) => response::paginated(page.items, page.pagination),
        Err(err) => response::app_error(err),
    }
}
