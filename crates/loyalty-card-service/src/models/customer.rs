//! 客户实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{self, LoyaltyStatus};

/// 积分上限，达到即可兑换
pub const MAX_POINTS: i32 = 10;
/// 新客户登记时的初始积分
pub const INITIAL_POINTS: i32 = 0;
/// 自动生成卡号的取值范围（6 位数字）
pub const CARD_CODE_MIN: u32 = 100_000;
pub const CARD_CODE_MAX: u32 = 999_999;

/// 客户
///
/// 以卡号为积分操作的主键，积分始终处于 [0, 10]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// 姓氏，可为空字符串
    pub surname: String,
    pub phone: String,
    pub card_code: String,
    pub points: i32,
    pub registered_at: DateTime<Utc>,
}

impl Customer {
    pub fn status(&self) -> LoyaltyStatus {
        LoyaltyStatus::classify(self.points)
    }

    pub fn status_message(&self) -> String {
        LoyaltyStatus::describe(self.points)
    }

    pub fn can_add_point(&self) -> bool {
        status::can_add_point(self.points)
    }

    pub fn can_redeem(&self) -> bool {
        status::can_redeem(self.points)
    }

    /// 全名，姓氏为空时只返回名字
    pub fn full_name(&self) -> String {
        if self.surname.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.surname)
        }
    }
}

/// 待写入的客户记录
///
/// 由服务层在校验、去空白、确定卡号之后构建
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub card_code: String,
    pub points: i32,
}

impl NewCustomer {
    /// 补齐存储分配的字段
    pub fn into_customer(self, id: Uuid, registered_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            surname: self.surname,
            phone: self.phone,
            card_code: self.card_code,
            points: self.points,
            registered_at,
        }
    }
}

/// 客户列表筛选条件
///
/// 文本条件做大小写不敏感的子串匹配，积分做精确匹配，多个条件取交集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    /// 匹配名字或姓氏
    pub name: Option<String>,
    pub phone: Option<String>,
    pub card_code: Option<String>,
    pub points: Option<i32>,
}

impl CustomerFilter {
    /// 去除首尾空白，空串视为未设置
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: clean(self.name),
            phone: clean(self.phone),
            card_code: clean(self.card_code),
            points: self.points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.card_code.is_none()
            && self.points.is_none()
    }

    /// 在内存中判断客户是否满足条件（调用前应先 normalized）
    pub fn matches(&self, customer: &Customer) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        if let Some(name) = &self.name
            && !contains(&customer.name, name)
            && !contains(&customer.surname, name)
        {
            return false;
        }
        if let Some(phone) = &self.phone
            && !contains(&customer.phone, phone)
        {
            return false;
        }
        if let Some(card_code) = &self.card_code
            && !contains(&customer.card_code, card_code)
        {
            return false;
        }
        if let Some(points) = self.points
            && customer.points != points
        {
            return false;
        }
        true
    }
}
