//! Visit entity for page view / page leave events
//!
//! 追加写：本子系统不存在更新与删除操作。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Path of the viewed page (never empty)
    pub page: String,
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
    /// Raw UA string, truncated to 500 chars at ingestion
    pub user_agent: String,
    pub language: String,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    /// Derived server-side: mobile / tablet / desktop
    pub device: String,
    /// Derived server-side: Chrome / Firefox / Safari / Edge / Opera / IE / Other
    pub browser: String,
    /// Derived server-side: Windows / macOS / Linux / Android / iOS / Other
    pub os: String,
    /// Client-generated, opaque, scoped to one browser tab
    pub session_id: String,
    /// Seconds on page; 0 on the initial page-view event
    pub duration: i32,
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
