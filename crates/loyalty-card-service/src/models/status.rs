//! 积分状态分级
//!
//! 纯函数，不涉及 I/O。展示文案与分级分离，由 [`LoyaltyStatus::describe`] 单独生成。

use serde::{Deserialize, Serialize};

use super::customer::MAX_POINTS;

/// 积分状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyStatus {
    /// 积累中：不足 9 分
    Building,
    /// 差一点：恰好 9 分
    OneAway,
    /// 可兑换：达到 10 分
    Eligible,
}

impl LoyaltyStatus {
    /// 按积分分级
    pub fn classify(points: i32) -> Self {
        if points >= MAX_POINTS {
            Self::Eligible
        } else if points == MAX_POINTS - 1 {
            Self::OneAway
        } else {
            Self::Building
        }
    }

    /// 面向客户的状态文案
    pub fn describe(points: i32) -> String {
        match Self::classify(points) {
            Self::Building => {
                let unit = if points == 1 { "point" } else { "points" };
                format!("has {points} {unit}, accumulate {MAX_POINTS} to be rewarded")
            }
            Self::OneAway => "one point away from reward".to_string(),
            Self::Eligible => format!("reached {MAX_POINTS} points, eligible for reward"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Building => "BUILDING",
            Self::OneAway => "ONE_AWAY",
            Self::Eligible => "ELIGIBLE",
        }
    }
}

impl std::fmt::Display for LoyaltyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 是否还能继续加点
pub fn can_add_point(points: i32) -> bool {
    points < MAX_POINTS
}

/// 是否可以兑换奖励
pub fn can_redeem(points: i32) -> bool {
    points == MAX_POINTS
}
