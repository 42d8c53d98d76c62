//! 应用状态
//!
//! 所有 handler 共享的服务实例与认证组件

use std::sync::Arc;

use loyalty_card::{CustomerRepositoryTrait, LifecycleService, LookupService};
use loyalty_shared::database::Database;

use crate::auth::{JwtConfig, JwtManager, TokenBlocklist};

/// 管理员账号
///
/// 只保存 bcrypt 哈希，不保存明文密码
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
}

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleService>,
    pub lookup: Arc<LookupService>,
    pub jwt_manager: Arc<JwtManager>,
    pub token_blocklist: TokenBlocklist,
    pub admin: Arc<AdminCredentials>,
    /// 内存存储模式下为空
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn CustomerRepositoryTrait>,
        jwt_config: JwtConfig,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            lifecycle: Arc::new(LifecycleService::new(repo.clone())),
            lookup: Arc::new(LookupService::new(repo)),
            jwt_manager: Arc::new(JwtManager::new(jwt_config)),
            token_blocklist: TokenBlocklist::new(),
            admin: Arc::new(admin),
            database: None,
        }
    }

    /// 附加数据库连接，供就绪检查使用
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}
