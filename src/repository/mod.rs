//! Storage abstraction
//!
//! Handlers 只依赖 `Repository` trait，后端由 `RepositoryFactory`
//! 根据配置选择，通过 `web::Data<Arc<dyn Repository>>` 注入。
//! 访问事件只追加：trait 上没有更新 / 删除事件的方法。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::config::Config;
use crate::errors::{Result, VitrineError};

pub mod backends;
pub mod models;

pub use models::{ContactMessage, NewMessage, NewProject, NewVisit, Project, Visit};

/// 聚合查询单次读取的最大事件数
pub const VISIT_QUERY_LIMIT: u64 = 10_000;

#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// 追加一条访问事件，返回分配的 id
    async fn append_visit(&self, visit: NewVisit) -> Result<i64>;
    /// 读取 `created_at >= cutoff` 的事件，按时间降序，最多 `limit` 条
    async fn visits_since(&self, cutoff: DateTime<Utc>, limit: u64) -> Result<Vec<Visit>>;

    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, id: i64) -> Result<Option<Project>>;
    async fn insert_project(&self, project: NewProject) -> Result<Project>;
    async fn update_project(&self, id: i64, project: NewProject) -> Result<Project>;
    async fn remove_project(&self, id: i64) -> Result<()>;

    async fn append_message(&self, message: NewMessage) -> Result<i64>;
    async fn list_messages(&self) -> Result<Vec<ContactMessage>>;
    async fn remove_message(&self, id: i64) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    pub async fn create(config: &Config) -> Result<Arc<dyn Repository>> {
        let backend = config.storage_backend.as_str();

        match backend {
            "sqlite" | "mysql" | "postgres" | "mariadb" => {
                let repository =
                    backends::sea_orm::SeaOrmRepository::new(&config.database_url, backend).await?;
                Ok(Arc::new(repository) as Arc<dyn Repository>)
            }
            "file" => {
                let repository = backends::file::FileRepository::new(&config.data_dir)?;
                Ok(Arc::new(repository) as Arc<dyn Repository>)
            }
            _ => {
                error!("Unknown storage backend: {}", backend);
                Err(VitrineError::database_config(format!(
                    "Unknown storage backend: {}. Supported: sqlite, mysql, postgres, mariadb, file",
                    backend
                )))
            }
        }
    }
}
