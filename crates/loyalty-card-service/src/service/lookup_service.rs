//! 客户查询服务（只读）
//!
//! - 精确查找：手机号或卡号完全相等
//! - 卡号查找：卡号完全相等
//! - 筛选列表：文本条件子串匹配（大小写不敏感），积分精确匹配

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{LoyaltyError, Result};
use crate::models::{Customer, CustomerFilter, MAX_POINTS};
use crate::repository::CustomerRepositoryTrait;

/// 客户查询服务
pub struct LookupService<R = dyn CustomerRepositoryTrait>
where
    R: CustomerRepositoryTrait + ?Sized,
{
    repo: Arc<R>,
}

impl<R> LookupService<R>
where
    R: CustomerRepositoryTrait + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 按手机号或卡号查找单个客户
    ///
    /// 同时命中不同客户时以卡号为准
    #[instrument(skip(self))]
    pub async fn find_one(&self, term: &str) -> Result<Option<Customer>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(LoyaltyError::Validation(
                "search term must not be blank".into(),
            ));
        }

        self.repo.find_by_phone_or_card_code(term).await
    }

    /// 按卡号查找
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, card_code: &str) -> Result<Option<Customer>> {
        let card_code = card_code.trim();
        if card_code.is_empty() {
            return Err(LoyaltyError::Validation(
                "card code must not be blank".into(),
            ));
        }

        self.repo.find_by_card_code(card_code).await
    }

    /// 按条件列出客户，按登记时间倒序
    ///
    /// 空条件返回全部客户
    #[instrument(skip(self))]
    pub async fn list(&self, filter: CustomerFilter) -> Result<Vec<Customer>> {
        let filter = filter.normalized();

        if let Some(points) = filter.points
            && !(0..=MAX_POINTS).contains(&points)
        {
            return Err(LoyaltyError::Validation(format!(
                "points filter must be between 0 and {MAX_POINTS}"
            )));
        }

        let customers = self.repo.list(&filter).await?;
        debug!(count = customers.len(), "客户列表查询完成");

        Ok(customers)
    }
}
