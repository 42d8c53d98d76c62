//! 会员积分卡服务
//!
//! 管理客户登记、到店加点、满点兑奖清零以及客户查询。
//!
//! ## 核心功能
//!
//! - **客户登记**：校验手机号唯一，生成或接收卡号，积分从 0 开始
//! - **加点**：每次到店 +1，封顶 10 分
//! - **兑奖清零**：兑换奖励后积分归零
//! - **状态分级**：按积分划分为积累中、差一点、可兑换三档
//! - **查询**：按手机号或卡号精确查找，按姓名、手机号、卡号、积分组合筛选
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 客户记录存储（PostgreSQL 与内存两种实现）
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{LoyaltyError, Result};
pub use models::*;
pub use repository::{CustomerRepository, CustomerRepositoryTrait, InMemoryCustomerRepository};
pub use service::{LifecycleService, LookupService, dto};
