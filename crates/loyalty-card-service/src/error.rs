//! 积分卡服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

/// 积分卡服务错误类型
#[derive(Debug, Error)]
pub enum LoyaltyError {
    // === 业务错误 ===
    #[error("手机号已登记: {0}")]
    DuplicatePhone(String),

    #[error("卡号已存在: {0}")]
    DuplicateCardCode(String),

    #[error("客户不存在: card_code={0}")]
    CustomerNotFound(String),

    #[error("积分未满，无法兑换: card_code={card_code}, points={points}")]
    RewardNotAvailable { card_code: String, points: i32 },

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 积分卡服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LoyaltyError>;

impl LoyaltyError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePhone(_) => "DUPLICATE_PHONE",
            Self::DuplicateCardCode(_) => "DUPLICATE_CARD_CODE",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::RewardNotAvailable { .. } => "REWARD_NOT_AVAILABLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_business_error() {
        assert!(LoyaltyError::DuplicatePhone("111".to_string()).is_business_error());
        assert!(LoyaltyError::CustomerNotFound("ABC".to_string()).is_business_error());
        assert!(LoyaltyError::Validation("name".to_string()).is_business_error());
        assert!(!LoyaltyError::Internal("boom".to_string()).is_business_error());
        assert!(!LoyaltyError::Database(sqlx::Error::PoolTimedOut).is_business_error());
    }

    #[test]
    fn test_error_code() {
        let cases = vec![
            (LoyaltyError::DuplicatePhone("1".into()), "DUPLICATE_PHONE"),
            (LoyaltyError::DuplicateCardCode("1".into()), "DUPLICATE_CARD_CODE"),
            (LoyaltyError::CustomerNotFound("1".into()), "CUSTOMER_NOT_FOUND"),
            (
                LoyaltyError::RewardNotAvailable { card_code: "1".into(), points: 3 },
                "REWARD_NOT_AVAILABLE",
            ),
            (LoyaltyError::Validation("x".into()), "VALIDATION_ERROR"),
            (LoyaltyError::Database(sqlx::Error::RowNotFound), "DATABASE_ERROR"),
            (LoyaltyError::Internal("x".into()), "INTERNAL_ERROR"),
        ];

        for (err, code) in cases {
            assert_eq!(err.error_code(), code, "error: {}", err);
        }
    }

    #[test]
    fn test_error_display() {
        let err = LoyaltyError::CustomerNotFound("UNKNOWN".to_string());
        assert!(err.to_string().contains("UNKNOWN"));

        let err = LoyaltyError::DuplicatePhone("555-0101".to_string());
        assert!(err.to_string().contains("555-0101"));
    }
}
