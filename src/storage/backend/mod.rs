//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite and PostgreSQL.

mod connection;
mod converters;
mod links;
mod users;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{CutterError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use users::vacated_username;
pub use converters::{model_to_link, model_to_role, model_to_user, new_link_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(CutterError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, postgres://",
            database_url
        )))
    }
}

/// 未配置时的连接超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str, pool_size: u32) -> Result<Self> {
        Self::with_timeout(database_url, backend_name, pool_size, DEFAULT_TIMEOUT_SECS).await
    }

    /// 指定连接超时（SQLite 下作为 busy_timeout）
    pub async fn with_timeout(
        database_url: &str,
        backend_name: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(CutterError::database_config("DATABASE_URL 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, timeout_secs).await?
        } else {
            connect_generic(database_url, backend_name, pool_size, timeout_secs).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 检查数据库是否可达
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| CutterError::database_connection(format!("数据库不可达: {}", e)))
    }
}
