//! 密码处理
//!
//! 管理员密码只以 bcrypt 哈希形式保存在配置中

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::AdminError;

/// 使用默认成本对密码进行哈希
pub fn hash_password(password: &str) -> Result<String, AdminError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// 使用指定成本对密码进行哈希
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AdminError> {
    hash(password, cost).map_err(|e| AdminError::Internal(format!("密码哈希失败: {}", e)))
}

/// 验证密码
///
/// 哈希格式非法时返回 Internal 错误，而不是当作密码错误
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AdminError> {
    verify(password, hash).map_err(|e| AdminError::Internal(format!("密码验证失败: {}", e)))
}
