use crate::entities::memorial_page_entity as pages;
use crate::models::MediaFileResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateMemorialPageRequest {
    #[schema(example = "Ông Ba")]
    pub name: Option<String>,
    pub content: Option<String>,
    pub is_premium: Option<bool>,
    #[schema(example = "device_k2j4h5l1m0")]
    pub device_id: Option<String>,
    /// Custom code; generated when absent.
    #[schema(example = "ONGBA1")]
    pub code: Option<String>,
}

/// Request metadata recorded once, when the page is created.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemorialPageResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub content: String,
    pub is_premium: bool,
    pub device_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub media_files: Vec<MediaFileResponse>,
}

impl MemorialPageResponse {
    pub fn new(page: pages::Model, media_files: Vec<MediaFileResponse>) -> Self {
        Self {
            id: page.id,
            code: page.code,
            name: page.name,
            content: page.content,
            is_premium: page.is_premium,
            device_id: page.device_id,
            created_at: page.created_at,
            last_accessed: page.last_accessed,
            media_files,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemorialPageSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<pages::Model> for MemorialPageSummary {
    fn from(page: pages::Model) -> Self {
        Self {
            id: page.id,
            code: page.code,
            name: page.name,
            created_at: page.created_at,
        }
    }
}
