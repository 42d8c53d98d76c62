//! 客户仓储（PostgreSQL）
//!
//! 积分变更均为单条带 RETURNING 的 UPDATE，由数据库保证原子性

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::CustomerRepositoryTrait;
use crate::error::{LoyaltyError, Result};
use crate::models::{Customer, CustomerFilter, INITIAL_POINTS, NewCustomer};

/// 手机号唯一约束名，与迁移脚本保持一致
const PHONE_UNIQUE_CONSTRAINT: &str = "uq_customers_phone";
/// 卡号唯一约束名
const CARD_CODE_UNIQUE_CONSTRAINT: &str = "uq_customers_card_code";

/// 客户仓储
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, phone, card_code, points, registered_at
            FROM customers
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_card_code(&self, card_code: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, phone, card_code, points, registered_at
            FROM customers
            WHERE card_code = $1
            "#,
        )
        .bind(card_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// 手机号或卡号精确匹配，卡号命中的记录排在前面
    pub async fn find_by_phone_or_card_code(&self, term: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, phone, card_code, points, registered_at
            FROM customers
            WHERE card_code = $1 OR phone = $1
            ORDER BY (card_code = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(term)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// 按条件列出客户
    ///
    /// 文本条件使用 ILIKE 子串匹配，输入中的通配符按字面量处理
    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, phone, card_code, points, registered_at
            FROM customers
            WHERE ($1::text IS NULL OR name ILIKE $1 OR surname ILIKE $1)
              AND ($2::text IS NULL OR phone ILIKE $2)
              AND ($3::text IS NULL OR card_code ILIKE $3)
              AND ($4::int IS NULL OR points = $4)
            ORDER BY registered_at DESC, id DESC
            "#,
        )
        .bind(filter.name.as_deref().map(contains_pattern))
        .bind(filter.phone.as_deref().map(contains_pattern))
        .bind(filter.card_code.as_deref().map(contains_pattern))
        .bind(filter.points)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    // ==================== 写入操作 ====================

    pub async fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, surname, phone, card_code, points)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, surname, phone, card_code, points, registered_at
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(&customer.phone)
        .bind(&customer.card_code)
        .bind(customer.points)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                match db_err.constraint() {
                    Some(PHONE_UNIQUE_CONSTRAINT) => {
                        return LoyaltyError::DuplicatePhone(customer.phone.clone());
                    }
                    Some(CARD_CODE_UNIQUE_CONSTRAINT) => {
                        return LoyaltyError::DuplicateCardCode(customer.card_code.clone());
                    }
                    _ => {}
                }
            }
            LoyaltyError::Database(e)
        })
    }

    /// 加一分并封顶，已在上限时返回原值
    pub async fn increment_points(
        &self,
        card_code: &str,
        ceiling: i32,
    ) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET points = LEAST(points + 1, $2)
            WHERE card_code = $1
            RETURNING id, name, surname, phone, card_code, points, registered_at
            "#,
        )
        .bind(card_code)
        .bind(ceiling)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn set_points(&self, card_code: &str, points: i32) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET points = $2
            WHERE card_code = $1
            RETURNING id, name, surname, phone, card_code, points, registered_at
            "#,
        )
        .bind(card_code)
        .bind(points)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn reset_points_if(
        &self,
        card_code: &str,
        expected: i32,
    ) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET points = $3
            WHERE card_code = $1 AND points = $2
            RETURNING id, name, surname, phone, card_code, points, registered_at
            "#,
        )
        .bind(card_code)
        .bind(expected)
        .bind(INITIAL_POINTS)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }
}

/// 构造 ILIKE 子串模式，转义 `\`、`%`、`_`
fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    async fn insert(&self, customer: NewCustomer) -> Result<Customer> {
        self.insert(customer).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>> {
        self.find_by_phone(phone).await
    }

    async fn find_by_card_code(&self, card_code: &str) -> Result<Option<Customer>> {
        self.find_by_card_code(card_code).await
    }

    async fn find_by_phone_or_card_code(&self, term: &str) -> Result<Option<Customer>> {
        self.find_by_phone_or_card_code(term).await
    }

    async fn increment_points(&self, card_code: &str, ceiling: i32) -> Result<Option<Customer>> {
        self.increment_points(card_code, ceiling).await
    }

    async fn set_points(&self, card_code: &str, points: i32) -> Result<Option<Customer>> {
        self.set_points(card_code, points).await
    }

    async fn reset_points_if(&self, card_code: &str, expected: i32) -> Result<Option<Customer>> {
        self.reset_points_if(card_code, expected).await
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        self.list(filter).await
    }
}
