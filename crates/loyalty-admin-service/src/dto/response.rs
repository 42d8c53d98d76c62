//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use chrono::{DateTime, Utc};
use loyalty_card::{Customer, LoyaltyStatus, MAX_POINTS};
use serde::Serialize;
use uuid::Uuid;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    /// 无数据时序列化为 null，字段始终存在
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    /// 创建带自定义消息的成功响应
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 客户详情（管理端）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub full_name: String,
    pub phone: String,
    pub card_code: String,
    pub points: i32,
    pub max_points: i32,
    pub status: LoyaltyStatus,
    pub status_message: String,
    /// 积分未满时可加点
    pub can_add_point: bool,
    /// 积分已满时可兑奖
    pub can_redeem: bool,
    pub registered_at: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            full_name: customer.full_name(),
            status: customer.status(),
            status_message: customer.status_message(),
            can_add_point: customer.can_add_point(),
            can_redeem: customer.can_redeem(),
            max_points: MAX_POINTS,
            id: customer.id,
            name: customer.name,
            surname: customer.surname,
            phone: customer.phone,
            card_code: customer.card_code,
            points: customer.points,
            registered_at: customer.registered_at,
        }
    }
}

/// 客户自助查询结果
///
/// 只暴露名字和积分，不含手机号、卡号和内部 ID
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPointsDto {
    pub first_name: String,
    pub points: i32,
    pub max_points: i32,
    pub status: LoyaltyStatus,
    pub status_message: String,
}

impl From<Customer> for PublicPointsDto {
    fn from(customer: Customer) -> Self {
        Self {
            status: customer.status(),
            status_message: customer.status_message(),
            max_points: MAX_POINTS,
            first_name: customer.name,
            points: customer.points,
        }
    }
}

/// 登录响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub username: String,
    /// Token 过期时间戳（秒）
    pub expires_at: i64,
}

impl LoginResponse {
    pub fn bearer(token: String, username: impl Into<String>, expires_at: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            username: username.into(),
            expires_at,
        }
    }
}

/// 当前登录管理员
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdminResponse {
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}
