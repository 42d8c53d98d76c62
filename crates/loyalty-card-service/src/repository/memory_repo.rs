//! 内存客户仓储
//!
//! 使用 DashMap 实现，适用于本地调试和测试。数据随进程退出丢失。

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use uuid::Uuid;

use super::traits::CustomerRepositoryTrait;
use crate::error::{LoyaltyError, Result};
use crate::models::{Customer, CustomerFilter, INITIAL_POINTS, NewCustomer};

/// 内存客户仓储
///
/// 以卡号为主键存储客户，另维护手机号到卡号的索引。
/// 积分变更在卡号条目的写锁内完成。
#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomerRepository {
    customers: Arc<DashMap<String, Customer>>,
    phone_index: Arc<DashMap<String, String>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前客户总数
    pub fn count(&self) -> usize {
        self.customers.len()
    }

    /// 写入新客户
    ///
    /// 锁顺序固定为先手机号索引后客户表
    pub fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        let phone_entry = match self.phone_index.entry(customer.phone.clone()) {
            Entry::Occupied(_) => return Err(LoyaltyError::DuplicatePhone(customer.phone)),
            Entry::Vacant(entry) => entry,
        };

        let card_entry = match self.customers.entry(customer.card_code.clone()) {
            Entry::Occupied(_) => {
                return Err(LoyaltyError::DuplicateCardCode(customer.card_code));
            }
            Entry::Vacant(entry) => entry,
        };

        let card_code = customer.card_code.clone();
        let created = customer.into_customer(Uuid::new_v4(), Utc::now());
        card_entry.insert(created.clone());
        phone_entry.insert(card_code);

        Ok(created)
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<Customer> {
        let card_code = self.phone_index.get(phone).map(|v| v.value().clone())?;
        self.find_by_card_code(&card_code)
    }

    pub fn find_by_card_code(&self, card_code: &str) -> Option<Customer> {
        self.customers.get(card_code).map(|v| v.value().clone())
    }

    pub fn find_by_phone_or_card_code(&self, term: &str) -> Option<Customer> {
        self.find_by_card_code(term)
            .or_else(|| self.find_by_phone(term))
    }

    pub fn increment_points(&self, card_code: &str, ceiling: i32) -> Option<Customer> {
        let mut entry = self.customers.get_mut(card_code)?;
        entry.points = (entry.points + 1).min(ceiling);
        Some(entry.value().clone())
    }

    pub fn set_points(&self, card_code: &str, points: i32) -> Option<Customer> {
        let mut entry = self.customers.get_mut(card_code)?;
        entry.points = points;
        Some(entry.value().clone())
    }

    pub fn reset_points_if(&self, card_code: &str, expected: i32) -> Option<Customer> {
        let mut entry = self.customers.get_mut(card_code)?;
        if entry.points != expected {
            return None;
        }
        entry.points = INITIAL_POINTS;
        Some(entry.value().clone())
    }

    pub fn list(&self, filter: &CustomerFilter) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        customers.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        customers
    }
}

#[async_trait]
impl CustomerRepositoryTrait for InMemoryCustomerRepository {
    async fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        InMemoryCustomerRepository::insert(self, customer)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::find_by_phone(self, phone))
    }

    async fn find_by_card_code(&self, card_code: &str) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::find_by_card_code(self, card_code))
    }

    async fn find_by_phone_or_card_code(&self, term: &str) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::find_by_phone_or_card_code(
            self, term,
        ))
    }

    async fn increment_points(&self, card_code: &str, ceiling: i32) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::increment_points(
            self, card_code, ceiling,
        ))
    }

    async fn set_points(&self, card_code: &str, points: i32) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::set_points(
            self, card_code, points,
        ))
    }

    async fn reset_points_if(&self, card_code: &str, expected: i32) -> Result<Option<Customer>> {
        Ok(InMemoryCustomerRepository::reset_points_if(
            self, card_code, expected,
        ))
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        Ok(InMemoryCustomerRepository::list(self, filter))
    }
}
