//! # 路由配置
//!
//! 查询接口与管理接口的路由组织

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{api_keys, health, query, questions, system};
use super::middleware::{admin_auth, request_id_middleware};
use super::server::AppState;

/// 管理接口前缀
pub const ADMIN_PREFIX: &str = "/admin/api";

/// 创建完整路由；未配置管理令牌时不挂载管理接口
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/query", get(query::query_answer));

    if state.config.admin.is_enabled() {
        router = router.nest(ADMIN_PREFIX, admin_routes(state.clone()));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(from_fn(request_id_middleware)),
    )
}

/// 管理接口路由
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/keys/{id}", delete(api_keys::delete_api_key))
        .route("/stats", get(system::get_stats))
        .route("/questions", get(questions::list_questions))
        .route("/questions/search", get(questions::search_questions))
        .route("/test-answer", get(system::test_answer))
        .route_layer(from_fn_with_state(state, admin_auth))
}
