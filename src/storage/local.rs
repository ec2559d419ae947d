use super::{PUBLIC_PREFIX, StorageBackend, StoredFile, UPLOAD_FOLDER};
use crate::entities::MediaType;
use crate::error::{AppError, AppResult};
use crate::utils::{file_extension, secure_filename};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const TEMP_PREFIX: &str = ".upload-";

/// Local filesystem storage rooted at the static directory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    static_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Maps a public path back to its location under the static directory.
    pub fn resolve(&self, public_path: &str) -> AppResult<PathBuf> {
        let relative = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                AppError::InternalError(format!("Media path outside {PUBLIC_PREFIX}: {public_path}"))
            })?;

        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::InternalError(format!(
                "Refusing to resolve media path {public_path}"
            )));
        }

        Ok(self.static_dir.join(relative))
    }

    fn upload_dir(&self, media_type: MediaType) -> PathBuf {
        self.static_dir
            .join(UPLOAD_FOLDER)
            .join(media_type.directory())
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn store(
        &self,
        data: &[u8],
        original_filename: &str,
        media_type: MediaType,
    ) -> AppResult<StoredFile> {
        let ext = file_extension(original_filename)
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or(AppError::DisallowedExtension)?;

        // The extension is plain ASCII, so the sanitized name is never empty.
        let file_name = secure_filename(original_filename);

        let dir = self.upload_dir(media_type);
        tokio::fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}.{ext}", Uuid::new_v4().simple());
        let final_path = dir.join(&stored_name);
        let temp_path = dir.join(format!("{TEMP_PREFIX}{}.tmp", Uuid::new_v4().simple()));

        // Nothing becomes visible under the final name until the bytes are synced.
        if let Err(err) = write_synced(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        let size = tokio::fs::metadata(&final_path).await?.len();
        if size != data.len() as u64 {
            let _ = tokio::fs::remove_file(&final_path).await;
            return Err(AppError::InternalError(format!(
                "Stored {size} bytes for {stored_name}, expected {}",
                data.len()
            )));
        }

        log::debug!("Stored {file_name} as {}", final_path.display());

        Ok(StoredFile {
            file_name,
            public_path: format!(
                "{PUBLIC_PREFIX}/{UPLOAD_FOLDER}/{}/{stored_name}",
                media_type.directory()
            ),
            size,
        })
    }

    async fn delete(&self, public_path: &str) -> AppResult<bool> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
