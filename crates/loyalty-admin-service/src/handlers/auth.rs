//! 认证相关的 HTTP 处理器
//!
//! 提供登录、登出、获取当前管理员和刷新 Token 的 API

use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{Claims, verify_password};
use crate::dto::{ApiResponse, CurrentAdminResponse, LoginRequest, LoginResponse};
use crate::error::{AdminError, Result};
use crate::state::AppState;

/// 管理员登录
///
/// POST /api/admin/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let Json(req) = payload?;
    req.validate()?;

    // 用户名不匹配时同样执行一次哈希校验，避免通过响应时间区分
    let password_hash = state.admin.password_hash.clone();
    let password = req.password;
    let password_valid = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AdminError::Internal(format!("密码校验任务失败: {}", e)))??;

    if req.username != state.admin.username || !password_valid {
        warn!(username = %req.username, "管理员登录失败");
        return Err(AdminError::InvalidCredentials);
    }

    let (token, expires_at) = state.jwt_manager.generate_token(&req.username)?;
    info!(username = %req.username, "管理员登录成功");

    Ok(Json(ApiResponse::success(LoginResponse::bearer(
        token,
        req.username,
        expires_at,
    ))))
}

/// 管理员登出
///
/// POST /api/admin/auth/logout
///
/// 当前 Token 的 jti 进入吊销表，直到其原过期时间
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<()>>> {
    state.token_blocklist.revoke(&claims.jti, claims.exp);
    info!(username = %claims.sub, "管理员已登出");

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 获取当前登录管理员
///
/// GET /api/admin/auth/me
pub async fn get_current_user(
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<CurrentAdminResponse>>> {
    Ok(Json(ApiResponse::success(CurrentAdminResponse {
        username: claims.sub,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })))
}

/// 刷新 Token
///
/// POST /api/admin/auth/refresh
///
/// 签发新 Token 并吊销旧 Token
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let (token, expires_at) = state.jwt_manager.refresh_token(&claims)?;
    state.token_blocklist.revoke(&claims.jti, claims.exp);

    Ok(Json(ApiResponse::success(LoginResponse::bearer(
        token,
        claims.sub,
        expires_at,
    ))))
}
