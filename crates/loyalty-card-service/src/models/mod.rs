//! 积分卡领域模型

pub mod customer;
pub mod status;

pub use customer::{
    CARD_CODE_MAX, CARD_CODE_MIN, Customer, CustomerFilter, INITIAL_POINTS, MAX_POINTS,
    NewCustomer,
};
pub use status::{LoyaltyStatus, can_add_point, can_redeem};
