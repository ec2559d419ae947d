use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(10))")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "video")]
    Video,
}

impl MediaType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }

    /// Directory under `uploads/` holding files of this type.
    pub fn directory(&self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Video => "videos",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "media_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub memorial_page_id: i32,
    pub file_type: MediaType,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::memorial_pages::Entity",
        from = "Column::MemorialPageId",
        to = "super::memorial_pages::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    MemorialPage,
}

impl Related<super::memorial_pages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemorialPage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
