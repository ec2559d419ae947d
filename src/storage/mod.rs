//! Media file storage.
//!
//! Uploads are written under `<static_dir>/uploads/{images,videos}` with generated names and
//! exposed to clients as `/static/uploads/{images,videos}/<name>`.

mod local;

pub use local::LocalStorage;

use crate::entities::MediaType;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Public URL prefix the static directory is mounted at.
pub const PUBLIC_PREFIX: &str = "/static";
/// Folder below the static directory that holds uploads.
pub const UPLOAD_FOLDER: &str = "uploads";

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Sanitized original name, kept for display only.
    pub file_name: String,
    /// Path clients fetch the file from.
    pub public_path: String,
    /// Bytes on disk.
    pub size: u64,
}

/// Storage backend for uploaded media.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Writes `data` under a fresh name that keeps only the extension of `original_filename`.
    async fn store(
        &self,
        data: &[u8],
        original_filename: &str,
        media_type: MediaType,
    ) -> AppResult<StoredFile>;

    /// Removes the file behind `public_path`. Returns `false` when it was already gone.
    async fn delete(&self, public_path: &str) -> AppResult<bool>;
}

pub type StorageService = Arc<dyn StorageBackend>;
