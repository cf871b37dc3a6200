//! Project entity for portfolio gallery entries

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: Option<String>,
    /// Cover image URL (CDN)
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_url: Option<String>,
    /// GLB model URL for the 3D viewer
    #[sea_orm(column_type = "Text", nullable)]
    pub model_url: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
