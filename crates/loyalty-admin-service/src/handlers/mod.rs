//! HTTP 请求处理器

pub mod auth;
pub mod customer;
pub mod health;
pub mod public;
