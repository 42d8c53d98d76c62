//! 服务层数据传输对象
//!
//! 定义服务层入参，与存储模型解耦

use serde::{Deserialize, Serialize};

use crate::error::{LoyaltyError, Result};

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 32;
pub const CARD_CODE_MAX_LEN: usize = 32;

/// 客户登记请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomer {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub phone: String,
    /// 为空时由服务生成 6 位数字卡号
    #[serde(default)]
    pub card_code: Option<String>,
}

impl RegisterCustomer {
    /// 校验并规范化
    ///
    /// 去除首尾空白；空白的姓氏和卡号视为未提供。
    pub fn validate(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        let surname = self
            .surname
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let card_code = self
            .card_code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if name.is_empty() {
            return Err(LoyaltyError::Validation("name must not be blank".into()));
        }
        if phone.is_empty() {
            return Err(LoyaltyError::Validation("phone must not be blank".into()));
        }
        if name.chars().count() > NAME_MAX_LEN
            || surname
                .as_ref()
                .is_some_and(|s| s.chars().count() > NAME_MAX_LEN)
        {
            return Err(LoyaltyError::Validation(format!(
                "name and surname must be at most {NAME_MAX_LEN} characters"
            )));
        }
        if phone.chars().count() > PHONE_MAX_LEN {
            return Err(LoyaltyError::Validation(format!(
                "phone must be at most {PHONE_MAX_LEN} characters"
            )));
        }
        if card_code
            .as_ref()
            .is_some_and(|c| c.chars().count() > CARD_CODE_MAX_LEN)
        {
            return Err(LoyaltyError::Validation(format!(
                "card code must be at most {CARD_CODE_MAX_LEN} characters"
            )));
        }

        Ok(Self {
            name,
            surname,
            phone,
            card_code,
        })
    }
}
