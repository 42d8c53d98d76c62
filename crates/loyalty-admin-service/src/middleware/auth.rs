//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将 Claims 注入请求扩展

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AdminError;
use crate::state::AppState;

/// 无需认证的精确路径
const PUBLIC_PATHS: [&str; 3] = ["/api/admin/auth/login", "/health", "/ready"];

/// 无需认证的路径前缀（客户自助查询）
const PUBLIC_PREFIXES: [&str; 1] = ["/api/public/"];

/// 判断路径是否无需认证
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// 认证中间件
///
/// 从 Authorization header 中提取 Bearer Token，验证签名、过期时间和吊销状态，
/// 通过后将 Claims 注入请求扩展。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return AdminError::Unauthorized("缺少认证 Token".to_string()).into_response();
    };

    let claims = match state.jwt_manager.verify_token(token) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    if state.token_blocklist.is_revoked(&claims.jti) {
        return AdminError::Unauthorized("Token 已注销".to_string()).into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}
