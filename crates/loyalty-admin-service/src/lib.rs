//! 会员积分卡管理后台服务
//!
//! 提供客户登记、加点、兑奖清零、客户查询的管理端 REST API，
//! 以及客户自助查询积分的公开 API。
//!
//! ## 核心功能
//!
//! - **管理员认证**：bcrypt 校验密码，签发 JWT，支持登出吊销和刷新
//! - **客户管理**：登记、加点、兑奖（仅满点可兑）、精确查找与筛选列表
//! - **公开查询**：凭手机号或卡号查询积分，不返回手机号等敏感字段
//!
//! ## 模块结构
//!
//! - `auth`: JWT、密码校验、Token 吊销表
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 认证与安全响应头中间件
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, CustomerDto, PublicPointsDto};
pub use error::{AdminError, Result};
pub use state::{AdminCredentials, AppState};
