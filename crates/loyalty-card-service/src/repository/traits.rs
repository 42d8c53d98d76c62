//! 仓储 Trait 定义
//!
//! 服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Customer, CustomerFilter, NewCustomer};

/// 客户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    /// 写入新客户，手机号或卡号冲突时返回对应的重复错误
    async fn insert(&self, customer: NewCustomer) -> Result<Customer>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>>;
    async fn find_by_card_code(&self, card_code: &str) -> Result<Option<Customer>>;

    /// 手机号或卡号精确匹配，两者分属不同客户时卡号优先
    async fn find_by_phone_or_card_code(&self, term: &str) -> Result<Option<Customer>>;

    /// 原子地执行 `points = min(points + 1, ceiling)`，卡号不存在返回 None
    async fn increment_points(&self, card_code: &str, ceiling: i32) -> Result<Option<Customer>>;

    /// 原子地设置积分，卡号不存在返回 None
    async fn set_points(&self, card_code: &str, points: i32) -> Result<Option<Customer>>;

    /// 仅当当前积分等于 `expected` 时原子地清零
    ///
    /// 卡号不存在或积分不等于 `expected` 时返回 None
    async fn reset_points_if(&self, card_code: &str, expected: i32) -> Result<Option<Customer>>;

    /// 按筛选条件列出，按登记时间倒序
    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>>;
}
