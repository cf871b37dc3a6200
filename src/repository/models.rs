//! Domain models shared by all storage backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条访问事件（落库后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: i64,
    pub page: String,
    pub referrer: String,
    pub user_agent: String,
    pub language: String,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub device: String,
    pub browser: String,
    pub os: String,
    pub session_id: String,
    pub duration: i32,
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// 待落库的访问事件，id 与 created_at 由存储层分配
#[derive(Debug, Clone, Default)]
pub struct NewVisit {
    pub page: String,
    pub referrer: String,
    pub user_agent: String,
    pub language: String,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub device: String,
    pub browser: String,
    pub os: String,
    pub session_id: String,
    pub duration: i32,
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
}

/// 作品集条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub model_url: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 作品创建 / 更新载荷
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub model_url: Option<String>,
    pub sort_order: i32,
}

/// 联系表单消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// 联系表单载荷
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}
