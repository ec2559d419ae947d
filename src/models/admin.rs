use crate::entities::memorial_page_entity as pages;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsResponse {
    pub total_pages: u64,
    /// Subscriptions currently marked active.
    pub total_premium: u64,
    pub total_media_files: u64,
    #[schema(example = "12.34MB")]
    pub storage_used: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminPageSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub media_count: i64,
}

impl AdminPageSummary {
    pub fn new(page: pages::Model, media_count: i64) -> Self {
        Self {
            id: page.id,
            code: page.code,
            name: page.name,
            is_premium: page.is_premium,
            created_at: page.created_at,
            last_accessed: page.last_accessed,
            media_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponse {
    pub deleted_count: u64,
    /// Pages skipped because their files or records could not be removed.
    pub failed_count: u64,
}

/// Byte count rendered as megabytes with two decimals, e.g. `1.50MB`.
pub fn format_megabytes(bytes: i64) -> String {
    format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00MB");
        assert_eq!(format_megabytes(1_572_864), "1.50MB");
        assert_eq!(format_megabytes(5 * 1024 * 1024), "5.00MB");
        assert_eq!(format_megabytes(1234), "0.00MB");
    }
}
