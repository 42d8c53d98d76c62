//! 客户管理 API 处理器
//!
//! 登记、加点、兑奖清零、查询

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use loyalty_card::CustomerFilter;
use tracing::info;
use validator::Validate;

use crate::dto::{ApiResponse, CustomerDto, ListCustomersQuery, RegisterCustomerRequest, SearchQuery};
use crate::error::{AdminError, Result};
use crate::state::AppState;

/// 登记新客户
///
/// POST /api/admin/customers
pub async fn register_customer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDto>>)> {
    let Json(req) = payload?;
    req.validate()?;

    let customer = state.lifecycle.register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CustomerDto::from(customer))),
    ))
}

/// 按条件列出客户
///
/// GET /api/admin/customers?name=&phone=&cardCode=&points=
pub async fn list_customers(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListCustomersQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CustomerDto>>>> {
    let Query(query) = query?;
    query.validate()?;

    let customers = state.lookup.list(CustomerFilter::from(query)).await?;
    let items = customers.into_iter().map(CustomerDto::from).collect();

    Ok(Json(ApiResponse::success(items)))
}

/// 按手机号或卡号精确查找
///
/// GET /api/admin/customers/search?term=
pub async fn search_customer(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CustomerDto>>> {
    let Query(query) = query?;
    query.validate()?;

    let customer = state
        .lookup
        .find_one(&query.term)
        .await?
        .ok_or_else(|| AdminError::CustomerNotFound(query.term.trim().to_string()))?;

    Ok(Json(ApiResponse::success(customer.into())))
}

/// 按卡号获取客户
///
/// GET /api/admin/customers/{card_code}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(card_code): Path<String>,
) -> Result<Json<ApiResponse<CustomerDto>>> {
    let customer = state
        .lookup
        .find_by_code(&card_code)
        .await?
        .ok_or_else(|| AdminError::CustomerNotFound(card_code.clone()))?;

    Ok(Json(ApiResponse::success(customer.into())))
}

/// 加一点
///
/// POST /api/admin/customers/{card_code}/points
///
/// 已满 10 点时积分不变，返回成功并提示已满
pub async fn add_point(
    State(state): State<AppState>,
    Path(card_code): Path<String>,
) -> Result<Json<ApiResponse<CustomerDto>>> {
    let customer = state.lifecycle.add_point(&card_code).await?;

    let response = if customer.can_redeem() {
        let message = customer.status_message();
        ApiResponse::success_with_message(CustomerDto::from(customer), message)
    } else {
        ApiResponse::success(CustomerDto::from(customer))
    };

    Ok(Json(response))
}

/// 兑奖并清零
///
/// POST /api/admin/customers/{card_code}/reward
///
/// 仅积分已满的客户可兑奖，否则返回 409 且积分不变
pub async fn redeem_reward(
    State(state): State<AppState>,
    Path(card_code): Path<String>,
) -> Result<Json<ApiResponse<CustomerDto>>> {
    let customer = state.lifecycle.redeem_reward(&card_code).await?;
    info!(card_code = %customer.card_code, "客户已兑奖");

    Ok(Json(ApiResponse::success_with_message(
        CustomerDto::from(customer),
        "兑奖成功，积分已清零",
    )))
}
