//! 已登出 Token 的吊销表
//!
//! 以 jti 为键记录到原过期时间为止，过期条目在写入时顺带清理

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

/// Token 吊销表
#[derive(Debug, Clone, Default)]
pub struct TokenBlocklist {
    revoked: Arc<DashMap<String, i64>>,
}

impl TokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// 吊销 Token，直到其原过期时间
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        self.purge_expired(Utc::now().timestamp());
        self.revoked.insert(jti.to_string(), expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    /// 清理已自然过期的条目
    fn purge_expired(&self, now: i64) {
        self.revoked.retain(|_, expires_at| *expires_at > now);
    }
}
