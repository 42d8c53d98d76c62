//! 服务层
//!
//! 实现积分卡业务逻辑，协调仓储层。
//!
//! ## 模块结构
//!
//! - `dto`: 服务入参定义与校验
//! - `lifecycle_service`: 登记、加点、兑奖清零（写操作）
//! - `lookup_service`: 精确查找与筛选列表（只读操作）

pub mod dto;
pub mod lifecycle_service;
pub mod lookup_service;

pub use dto::*;
pub use lifecycle_service::LifecycleService;
pub use lookup_service::LookupService;
