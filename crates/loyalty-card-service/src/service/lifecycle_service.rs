//! 积分生命周期服务
//!
//! 处理客户积分的全部写操作：
//! - 登记：手机号查重，生成或校验卡号，初始积分为 0
//! - 加点：每次 +1，封顶 10 分，已封顶时原样返回
//! - 兑奖清零：无条件归零，是否满足兑换条件由调用方判断
//! - 满点兑奖：积分等于上限时才清零，条件与写入一次完成
//!
//! 每个操作至多一次写入，失败时存储状态不变。

use std::sync::Arc;

use rand::Rng;
use tracing::{info, instrument, warn};

use loyalty_shared::observability::metrics;

use crate::error::{LoyaltyError, Result};
use crate::models::{CARD_CODE_MAX, CARD_CODE_MIN, Customer, INITIAL_POINTS, MAX_POINTS, NewCustomer};
use crate::repository::CustomerRepositoryTrait;
use crate::service::dto::RegisterCustomer;

/// 生成卡号的最大尝试次数
const CARD_CODE_ATTEMPTS: usize = 5;

/// 生成 6 位数字卡号
pub fn generate_card_code() -> String {
    rand::rng()
        .random_range(CARD_CODE_MIN..=CARD_CODE_MAX)
        .to_string()
}

/// 积分生命周期服务
pub struct LifecycleService<R = dyn CustomerRepositoryTrait>
where
    R: CustomerRepositoryTrait + ?Sized,
{
    repo: Arc<R>,
}

impl<R> LifecycleService<R>
where
    R: CustomerRepositoryTrait + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 登记新客户
    ///
    /// 1. 校验并规范化入参
    /// 2. 手机号查重
    /// 3. 使用给定卡号或生成卡号写入
    #[instrument(skip(self, request), fields(phone = %request.phone))]
    pub async fn register(&self, request: RegisterCustomer) -> Result<Customer> {
        let request = request.validate()?;

        if self.repo.find_by_phone(&request.phone).await?.is_some() {
            warn!(phone = %request.phone, "手机号已登记");
            metrics::record_registration("duplicate_phone");
            return Err(LoyaltyError::DuplicatePhone(request.phone));
        }

        let result = match request.card_code.clone() {
            Some(card_code) => self.register_with_code(&request, card_code).await,
            None => self.register_with_generated_code(&request).await,
        };

        match &result {
            Ok(customer) => {
                metrics::record_registration("success");
                info!(
                    customer_id = %customer.id,
                    card_code = %customer.card_code,
                    "客户登记成功"
                );
            }
            Err(e) => metrics::record_registration(outcome_label(e)),
        }

        result
    }

    async fn register_with_code(
        &self,
        request: &RegisterCustomer,
        card_code: String,
    ) -> Result<Customer> {
        if self.repo.find_by_card_code(&card_code).await?.is_some() {
            return Err(LoyaltyError::DuplicateCardCode(card_code));
        }
        self.repo.insert(new_customer(request, card_code)).await
    }

    /// 生成的卡号冲突时重新抽取，并发写入导致的唯一约束冲突同样重试
    async fn register_with_generated_code(&self, request: &RegisterCustomer) -> Result<Customer> {
        for attempt in 1..=CARD_CODE_ATTEMPTS {
            let card_code = generate_card_code();

            if self.repo.find_by_card_code(&card_code).await?.is_some() {
                warn!(attempt, card_code = %card_code, "生成的卡号已存在，重新生成");
                continue;
            }

            match self.repo.insert(new_customer(request, card_code)).await {
                Err(LoyaltyError::DuplicateCardCode(code)) => {
                    warn!(attempt, card_code = %code, "卡号写入冲突，重新生成");
                }
                other => return other,
            }
        }

        Err(LoyaltyError::Internal(format!(
            "failed to generate a unique card code after {CARD_CODE_ATTEMPTS} attempts"
        )))
    }

    /// 到店加一分
    ///
    /// 已达上限时成功返回且积分不变
    #[instrument(skip(self))]
    pub async fn add_point(&self, card_code: &str) -> Result<Customer> {
        let customer = self
            .repo
            .increment_points(card_code, MAX_POINTS)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(card_code.to_string()))?;

        metrics::record_point_added(customer.points >= MAX_POINTS);

        info!(
            card_code = %customer.card_code,
            points = customer.points,
            status = %customer.status(),
            "加点完成"
        );

        Ok(customer)
    }

    /// 兑换奖励并清零
    #[instrument(skip(self))]
    pub async fn reward_and_reset(&self, card_code: &str) -> Result<Customer> {
        let customer = self
            .repo
            .set_points(card_code, INITIAL_POINTS)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(card_code.to_string()))?;

        metrics::record_reward();

        info!(card_code = %customer.card_code, "兑奖完成，积分已清零");

        Ok(customer)
    }

    /// 满点兑奖
    ///
    /// 仅当积分等于上限时清零，判断与清零在存储层一次完成，
    /// 同一张满点卡并发兑奖只有一次成功。
    #[instrument(skip(self))]
    pub async fn redeem_reward(&self, card_code: &str) -> Result<Customer> {
        if let Some(customer) = self.repo.reset_points_if(card_code, MAX_POINTS).await? {
            metrics::record_reward();
            info!(card_code = %customer.card_code, "兑奖完成，积分已清零");
            return Ok(customer);
        }

        match self.repo.find_by_card_code(card_code).await? {
            Some(customer) => {
                warn!(card_code = %customer.card_code, points = customer.points, "积分未满，拒绝兑奖");
                Err(LoyaltyError::RewardNotAvailable {
                    card_code: customer.card_code,
                    points: customer.points,
                })
            }
            None => Err(LoyaltyError::CustomerNotFound(card_code.to_string())),
        }
    }
}

fn new_customer(request: &RegisterCustomer, card_code: String) -> NewCustomer {
    NewCustomer {
        name: request.name.clone(),
        surname: request.surname.clone().unwrap_or_default(),
        phone: request.phone.clone(),
        card_code,
        points: INITIAL_POINTS,
    }
}

fn outcome_label(err: &LoyaltyError) -> &'static str {
    match err {
        LoyaltyError::DuplicatePhone(_) => "duplicate_phone",
        LoyaltyError::DuplicateCardCode(_) => "duplicate_card_code",
        LoyaltyError::Validation(_) => "invalid",
        _ => "error",
    }
}
