//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post},
};
use loyalty_shared::observability::middleware as obs_middleware;

use crate::middleware::{auth_middleware, security_headers};
use crate::{handlers, state::AppState};

/// 认证相关路由
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::get_current_user))
        .route("/auth/refresh", post(handlers::auth::refresh_token))
}

/// 客户管理路由
///
/// `/customers/search` 为静态段，优先于 `/customers/{card_code}` 匹配
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            post(handlers::customer::register_customer).get(handlers::customer::list_customers),
        )
        .route("/customers/search", get(handlers::customer::search_customer))
        .route("/customers/{card_code}", get(handlers::customer::get_customer))
        .route(
            "/customers/{card_code}/points",
            post(handlers::customer::add_point),
        )
        .route(
            "/customers/{card_code}/reward",
            post(handlers::customer::redeem_reward),
        )
}

/// 管理端 API 路由，挂载在 `/api/admin` 下
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(customer_routes())
}

/// 客户自助查询路由，挂载在 `/api/public` 下
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/points", get(handlers::public::lookup_points))
}

/// 组装完整应用
///
/// 中间件由外到内：request_id → http_tracing → security_headers → auth。
/// CORS 由调用方按部署配置叠加在最外层。
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/admin", api_routes())
        .nest("/api/public", public_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
