//! JSON file repository backend
//!
//! 数据目录下三个 JSON 文件（visits.json / projects.json /
//! messages.json），内存 RwLock 缓存 + 全量写回。并发写在锁上串行化，
//! 个人站点的量级足够了。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::errors::{Result, VitrineError};
use crate::repository::models::{
    ContactMessage, NewMessage, NewProject, NewVisit, Project, Visit,
};
use crate::repository::Repository;

pub struct FileRepository {
    dir: PathBuf,
    visits: RwLock<Vec<Visit>>,
    projects: RwLock<Vec<Project>>,
    messages: RwLock<Vec<ContactMessage>>,
}

impl FileRepository {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            VitrineError::file_operation(format!("创建数据目录失败 {}: {}", dir.display(), e))
        })?;

        let visits: Vec<Visit> = Self::load_collection(&dir.join("visits.json"))?;
        let projects: Vec<Project> = Self::load_collection(&dir.join("projects.json"))?;
        let messages: Vec<ContactMessage> = Self::load_collection(&dir.join("messages.json"))?;

        info!(
            "FileRepository 初始化完成：{} 次访问，{} 个作品，{} 条消息",
            visits.len(),
            projects.len(),
            messages.len()
        );

        Ok(FileRepository {
            dir: dir.to_path_buf(),
            visits: RwLock::new(visits),
            projects: RwLock::new(projects),
            messages: RwLock::new(messages),
        })
    }

    fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                VitrineError::serialization(format!("解析 {} 失败: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 文件不存在，创建空集合
                fs::write(path, "[]").map_err(|e| {
                    VitrineError::file_operation(format!("创建 {} 失败: {}", path.display(), e))
                })?;
                Ok(Vec::new())
            }
            // 其它读取失败（权限、非 UTF-8 等）直接报错，不能覆盖现有文件
            Err(e) => Err(VitrineError::file_operation(format!(
                "读取 {} 失败: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_collection<T: Serialize>(&self, filename: &str, items: &[T]) -> Result<()> {
        let path = self.dir.join(filename);
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&path, json).map_err(|e| {
            VitrineError::file_operation(format!("写入 {} 失败: {}", path.display(), e))
        })?;
        Ok(())
    }

    fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
        items.iter().map(&id_of).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn append_visit(&self, new: NewVisit) -> Result<i64> {
        let mut visits = self.visits.write().unwrap();
        let id = Self::next_id(&visits, |v: &Visit| v.id);

        visits.push(Visit {
            id,
            page: new.page,
            referrer: new.referrer,
            user_agent: new.user_agent,
            language: new.language,
            screen_width: new.screen_width,
            screen_height: new.screen_height,
            device: new.device,
            browser: new.browser,
            os: new.os,
            session_id: new.session_id,
            duration: new.duration,
            lcp: new.lcp,
            fcp: new.fcp,
            cls: new.cls,
            ttfb: new.ttfb,
            created_at: Utc::now(),
        });

        self.save_collection("visits.json", &visits)?;
        Ok(id)
    }

    async fn visits_since(&self, cutoff: DateTime<Utc>, limit: u64) -> Result<Vec<Visit>> {
        let visits = self.visits.read().unwrap();

        let mut matched: Vec<Visit> = visits
            .iter()
            .filter(|v| v.created_at >= cutoff)
            .cloned()
            .collect();
        // 最近的在前
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit as usize);

        Ok(matched)
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = self.projects.read().unwrap();

        let mut listed = projects.clone();
        listed.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.created_at.cmp(&a.created_at))
        });

        Ok(listed)
    }

    async fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let projects = self.projects.read().unwrap();
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_project(&self, new: NewProject) -> Result<Project> {
        let mut projects = self.projects.write().unwrap();
        let now = Utc::now();

        let project = Project {
            id: Self::next_id(&projects, |p: &Project| p.id),
            title: new.title,
            description: new.description,
            category: new.category,
            cover_url: new.cover_url,
            model_url: new.model_url,
            sort_order: new.sort_order,
            created_at: now,
            updated_at: now,
        };

        projects.push(project.clone());
        self.save_collection("projects.json", &projects)?;

        info!("Project created: {}", project.id);
        Ok(project)
    }

    async fn update_project(&self, id: i64, new: NewProject) -> Result<Project> {
        let mut projects = self.projects.write().unwrap();

        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| VitrineError::not_found(format!("作品不存在: {}", id)))?;

        project.title = new.title;
        project.description = new.description;
        project.category = new.category;
        project.cover_url = new.cover_url;
        project.model_url = new.model_url;
        project.sort_order = new.sort_order;
        project.updated_at = Utc::now();

        let updated = project.clone();
        self.save_collection("projects.json", &projects)?;

        info!("Project updated: {}", id);
        Ok(updated)
    }

    async fn remove_project(&self, id: i64) -> Result<()> {
        let mut projects = self.projects.write().unwrap();

        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(VitrineError::not_found(format!("作品不存在: {}", id)));
        }

        self.save_collection("projects.json", &projects)?;

        info!("Project deleted: {}", id);
        Ok(())
    }

    async fn append_message(&self, new: NewMessage) -> Result<i64> {
        let mut messages = self.messages.write().unwrap();
        let id = Self::next_id(&messages, |m: &ContactMessage| m.id);

        messages.push(ContactMessage {
            id,
            name: new.name,
            email: new.email,
            message: new.message,
            created_at: Utc::now(),
        });

        self.save_collection("messages.json", &messages)?;
        Ok(id)
    }

    async fn list_messages(&self) -> Result<Vec<ContactMessage>> {
        let messages = self.messages.read().unwrap();

        let mut listed = messages.clone();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(listed)
    }

    async fn remove_message(&self, id: i64) -> Result<()> {
        let mut messages = self.messages.write().unwrap();

        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Err(VitrineError::not_found(format!("联系消息不存在: {}", id)));
        }

        self.save_collection("messages.json", &messages)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
