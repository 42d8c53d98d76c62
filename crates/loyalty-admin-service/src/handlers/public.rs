//! 客户自助查询 API
//!
//! 无需认证，只返回名字和积分

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::dto::{ApiResponse, PublicPointsDto, SearchQuery};
use crate::error::{AdminError, Result};
use crate::state::AppState;

/// 凭手机号或卡号查询积分
///
/// GET /api/public/points?term=
pub async fn lookup_points(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PublicPointsDto>>> {
    let Query(query) = query?;
    query.validate()?;

    // 不回显查询条件，避免在响应中泄露手机号
    let customer = state
        .lookup
        .find_one(&query.term)
        .await?
        .ok_or_else(|| AdminError::NotFound("未找到对应的会员卡".to_string()))?;

    Ok(Json(ApiResponse::success(customer.into())))
}
