//! 认证模块
//!
//! JWT 签发与校验、管理员密码校验、登出后的 Token 吊销表

mod blocklist;
mod jwt;
mod password;

pub use blocklist::TokenBlocklist;
pub use jwt::{Claims, JwtConfig, JwtManager};
pub use password::{hash_password, hash_password_with_cost, verify_password};
