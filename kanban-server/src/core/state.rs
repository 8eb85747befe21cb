use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 所有 handler 共享的单例引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 打开数据库、应用迁移并构建共享状态
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
            pool: db.pool,
            config: Arc::new(config.clone()),
        })
    }

    /// 用已有连接池构建状态 (测试场景)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt)),
            pool,
            config: Arc::new(config),
        }
    }
}
