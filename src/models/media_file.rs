use crate::entities::{MediaType, media_file_entity as media};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaFileResponse {
    pub id: i32,
    pub memorial_page_id: i32,
    pub file_type: MediaType,
    pub file_name: String,
    #[schema(example = "/static/uploads/images/3f2a9c0e5b7d4e1fa0c6d8b2e4f61a3c.jpg")]
    pub file_path: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<media::Model> for MediaFileResponse {
    fn from(m: media::Model) -> Self {
        Self {
            id: m.id,
            memorial_page_id: m.memorial_page_id,
            file_type: m.file_type,
            file_name: m.file_name,
            file_path: m.file_path,
            file_size: m.file_size,
            uploaded_at: m.uploaded_at,
        }
    }
}

/// Multipart form accepted by the upload endpoint (documentation only).
#[derive(Debug, ToSchema)]
pub struct UploadMediaForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(example = "image")]
    pub file_type: String,
}

/// `file` part of an upload. `size` counts every byte received, `data` may be cut short.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub file: Option<UploadedFile>,
    pub file_type: Option<String>,
}
