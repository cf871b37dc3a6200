//! Sea-ORM repository backend (SQLite / PostgreSQL / MySQL)
//!
//! 连接配置与迁移执行沿用 sqlx 连接池，SQLite 启用 WAL 与常用 pragma。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{info, warn};

use crate::errors::{Result, VitrineError};
use crate::repository::models::{
    ContactMessage, NewMessage, NewProject, NewVisit, Project, Visit,
};
use crate::repository::Repository;

use migration::entities::{contact_message, project, visit};
use migration::{Migrator, MigratorTrait};

#[derive(Clone)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
    backend_name: &'static str,
}

impl SeaOrmRepository {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(VitrineError::database_config("DATABASE_URL 未设置"));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let backend_name = match backend_name {
            "sqlite" => "sqlite",
            "mysql" => "mysql",
            "mariadb" => "mariadb",
            _ => "postgres",
        };

        let repository = SeaOrmRepository { db, backend_name };

        // 运行迁移
        repository.run_migrations().await?;

        warn!(
            "{} Repository initialized.",
            repository.backend_name.to_uppercase()
        );
        Ok(repository)
    }

    /// 连接 SQLite 数据库（带自动创建和性能优化）
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| VitrineError::database_config(format!("SQLite URL 解析失败: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 使用 sqlx 的连接池
        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            VitrineError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

        // 转换为 Sea-ORM 的 DatabaseConnection
        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 连接通用数据库（MySQL/PostgreSQL）
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(20)
            .min_connections(2)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            VitrineError::database_connection(format!(
                "无法连接到 {} 数据库: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| VitrineError::database_operation(format!("迁移失败: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    fn model_to_visit(model: visit::Model) -> Visit {
        Visit {
            id: model.id,
            page: model.page,
            referrer: model.referrer,
            user_agent: model.user_agent,
            language: model.language,
            screen_width: model.screen_width,
            screen_height: model.screen_height,
            device: model.device,
            browser: model.browser,
            os: model.os,
            session_id: model.session_id,
            duration: model.duration,
            lcp: model.lcp,
            fcp: model.fcp,
            cls: model.cls,
            ttfb: model.ttfb,
            created_at: model.created_at,
        }
    }

    fn model_to_project(model: project::Model) -> Project {
        Project {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            cover_url: model.cover_url,
            model_url: model.model_url,
            sort_order: model.sort_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn model_to_message(model: contact_message::Model) -> ContactMessage {
        ContactMessage {
            id: model.id,
            name: model.name,
            email: model.email,
            message: model.message,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl Repository for SeaOrmRepository {
    async fn append_visit(&self, new: NewVisit) -> Result<i64> {
        let active = visit::ActiveModel {
            page: Set(new.page),
            referrer: Set(new.referrer),
            user_agent: Set(new.user_agent),
            language: Set(new.language),
            screen_width: Set(new.screen_width),
            screen_height: Set(new.screen_height),
            device: Set(new.device),
            browser: Set(new.browser),
            os: Set(new.os),
            session_id: Set(new.session_id),
            duration: Set(new.duration),
            lcp: Set(new.lcp),
            fcp: Set(new.fcp),
            cls: Set(new.cls),
            ttfb: Set(new.ttfb),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("写入访问事件失败: {}", e)))?;

        Ok(model.id)
    }

    async fn visits_since(&self, cutoff: DateTime<Utc>, limit: u64) -> Result<Vec<Visit>> {
        let models = visit::Entity::find()
            .filter(visit::Column::CreatedAt.gte(cutoff))
            .order_by_desc(visit::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("查询访问事件失败: {}", e)))?;

        Ok(models.into_iter().map(Self::model_to_visit).collect())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let models = project::Entity::find()
            .order_by_asc(project::Column::SortOrder)
            .order_by_desc(project::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("查询作品列表失败: {}", e)))?;

        Ok(models.into_iter().map(Self::model_to_project).collect())
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let model = project::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("查询作品失败: {}", e)))?;

        Ok(model.map(Self::model_to_project))
    }

    async fn insert_project(&self, new: NewProject) -> Result<Project> {
        let now = Utc::now();
        let active = project::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            category: Set(new.category),
            cover_url: Set(new.cover_url),
            model_url: Set(new.model_url),
            sort_order: Set(new.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("创建作品失败: {}", e)))?;

        info!("Project created: {}", model.id);
        Ok(Self::model_to_project(model))
    }

    async fn update_project(&self, id: i64, new: NewProject) -> Result<Project> {
        let existing = project::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("查询作品失败: {}", e)))?
            .ok_or_else(|| VitrineError::not_found(format!("作品不存在: {}", id)))?;

        let mut active: project::ActiveModel = existing.into();
        active.title = Set(new.title);
        active.description = Set(new.description);
        active.category = Set(new.category);
        active.cover_url = Set(new.cover_url);
        active.model_url = Set(new.model_url);
        active.sort_order = Set(new.sort_order);
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("更新作品失败: {}", e)))?;

        info!("Project updated: {}", id);
        Ok(Self::model_to_project(model))
    }

    async fn remove_project(&self, id: i64) -> Result<()> {
        let result = project::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("删除作品失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(VitrineError::not_found(format!("作品不存在: {}", id)));
        }

        info!("Project deleted: {}", id);
        Ok(())
    }

    async fn append_message(&self, new: NewMessage) -> Result<i64> {
        let active = contact_message::ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            message: Set(new.message),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("写入联系消息失败: {}", e)))?;

        Ok(model.id)
    }

    async fn list_messages(&self) -> Result<Vec<ContactMessage>> {
        let models = contact_message::Entity::find()
            .order_by_desc(contact_message::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("查询联系消息失败: {}", e)))?;

        Ok(models.into_iter().map(Self::model_to_message).collect())
    }

    async fn remove_message(&self, id: i64) -> Result<()> {
        let result = contact_message::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| VitrineError::database_operation(format!("删除联系消息失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(VitrineError::not_found(format!("联系消息不存在: {}", id)));
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.backend_name
    }
}
