//! 中间件模块
//!
//! 提供认证和安全响应头中间件

mod auth;
mod security;

pub use auth::{auth_middleware, is_public_path};
pub use security::security_headers;
