//! 会员积分卡管理后台服务入口

use std::sync::Arc;

use anyhow::bail;
use axum::http::HeaderValue;
use loyalty_admin_service::{
    AdminCredentials, AppState,
    auth::{JwtConfig, hash_password},
    routes,
};
use loyalty_card::{CustomerRepository, CustomerRepositoryTrait, InMemoryCustomerRepository};
use loyalty_shared::{
    config::{AppConfig, StorageBackend},
    database::Database,
    observability::{self, ObservabilityConfig},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "loyalty-admin-service";
const DEV_JWT_SECRET: &str = "loyalty-admin-dev-secret-change-in-production";
const DEV_ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME)?;

    let _guard = observability::init(&ObservabilityConfig::from_app_config(&config)).await?;

    info!(
        environment = %config.environment,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    let (repo, database) = init_storage(&config).await?;
    let jwt_config = JwtConfig::from_auth_config(&config.auth, resolve_jwt_secret(&config)?);
    let admin = AdminCredentials {
        username: config.auth.admin_username.clone(),
        password_hash: resolve_admin_password_hash(&config)?,
    };

    let mut state = AppState::new(repo, jwt_config, admin);
    if let Some(db) = database.clone() {
        state = state.with_database(db);
    }

    let app = routes::build_app(state).layer(build_cors(&config));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }
    info!("Server shutdown complete");

    Ok(())
}

/// 按配置选择存储后端
async fn init_storage(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn CustomerRepositoryTrait>, Option<Database>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            if config.database.run_migrations {
                db.run_migrations().await?;
                info!("Database migrations applied");
            }
            let repo: Arc<dyn CustomerRepositoryTrait> =
                Arc::new(CustomerRepository::new(db.pool().clone()));
            Ok((repo, Some(db)))
        }
        StorageBackend::Memory => {
            if config.is_production() {
                warn!("生产环境使用内存存储，服务重启后客户数据将丢失");
            }
            info!("Using in-memory customer storage");
            let repo: Arc<dyn CustomerRepositoryTrait> = Arc::new(InMemoryCustomerRepository::new());
            Ok((repo, None))
        }
    }
}

/// JWT 密钥：生产环境必须通过 LOYALTY__AUTH__JWT_SECRET 注入
fn resolve_jwt_secret(config: &AppConfig) -> anyhow::Result<String> {
    match &config.auth.jwt_secret {
        Some(secret) if !secret.trim().is_empty() => Ok(secret.clone()),
        _ if config.is_production() => {
            bail!("LOYALTY__AUTH__JWT_SECRET must be set in production environment")
        }
        _ => {
            warn!("Using default JWT secret - set LOYALTY__AUTH__JWT_SECRET for production");
            Ok(DEV_JWT_SECRET.to_string())
        }
    }
}

/// 管理员密码哈希：生产环境必须通过 LOYALTY__AUTH__ADMIN_PASSWORD_HASH 注入
fn resolve_admin_password_hash(config: &AppConfig) -> anyhow::Result<String> {
    match &config.auth.admin_password_hash {
        Some(hash) if !hash.trim().is_empty() => Ok(hash.clone()),
        _ if config.is_production() => {
            bail!("LOYALTY__AUTH__ADMIN_PASSWORD_HASH must be set in production environment")
        }
        _ => {
            warn!(
                username = %config.auth.admin_username,
                "Using default admin password - set LOYALTY__AUTH__ADMIN_PASSWORD_HASH for production"
            );
            Ok(hash_password(DEV_ADMIN_PASSWORD)?)
        }
    }
}

/// CORS 配置：通过 LOYALTY_CORS_ORIGINS 环境变量控制允许的来源
fn build_cors(config: &AppConfig) -> CorsLayer {
    let allowed_origins = std::env::var("LOYALTY_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    if allowed_origins == "*" {
        if config.is_production() {
            warn!("LOYALTY_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// 监听关闭信号（SIGTERM 或 Ctrl+C）
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
