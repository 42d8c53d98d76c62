//! 管理后台错误类型定义
//!
//! 统一转换为 `{success, code, message, data}` 响应体

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use loyalty_card::LoyaltyError;
use serde_json::json;

/// 管理后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("用户名或密码错误")]
    InvalidCredentials,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 资源不存在
    #[error("客户不存在: {0}")]
    CustomerNotFound(String),
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 业务冲突
    #[error("手机号已登记: {0}")]
    DuplicatePhone(String),
    #[error("卡号已存在: {0}")]
    DuplicateCardCode(String),
    #[error("积分未满，无法兑换: card_code={card_code}, points={points}")]
    RewardNotAvailable { card_code: String, points: i32 },

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::CustomerNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::DuplicatePhone(_) | Self::DuplicateCardCode(_) | Self::RewardNotAvailable { .. } => {
                StatusCode::CONFLICT
            }

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicatePhone(_) => "DUPLICATE_PHONE",
            Self::DuplicateCardCode(_) => "DUPLICATE_CARD_CODE",
            Self::RewardNotAvailable { .. } => "REWARD_NOT_AVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体无法解析
impl From<JsonRejection> for AdminError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 查询参数无法解析
impl From<QueryRejection> for AdminError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 从积分卡服务的错误转换
impl From<LoyaltyError> for AdminError {
    fn from(err: LoyaltyError) -> Self {
        match err {
            LoyaltyError::DuplicatePhone(phone) => Self::DuplicatePhone(phone),
            LoyaltyError::DuplicateCardCode(code) => Self::DuplicateCardCode(code),
            LoyaltyError::CustomerNotFound(code) => Self::CustomerNotFound(code),
            LoyaltyError::RewardNotAvailable { card_code, points } => {
                Self::RewardNotAvailable { card_code, points }
            }
            LoyaltyError::Validation(msg) => Self::Validation(msg),
            LoyaltyError::Database(e) => Self::Database(e),
            LoyaltyError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;
