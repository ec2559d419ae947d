use crate::entities::{MediaType, media_file_entity as media, memorial_page_entity as pages};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::PremiumService;
use crate::services::media_validator::{check_quota, count_media, validate_file};
use crate::storage::{StorageService, StoredFile};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait};

#[derive(Clone)]
pub struct MediaService {
    pool: DatabaseConnection,
    storage: StorageService,
    premium_service: PremiumService,
}

impl MediaService {
    pub fn new(pool: DatabaseConnection, storage: StorageService) -> Self {
        let premium_service = PremiumService::new(pool.clone());
        Self {
            pool,
            storage,
            premium_service,
        }
    }

    /// Validates, stores and records one upload for `page_id`.
    ///
    /// The file is written before the record; if the record cannot be committed the file is removed
    /// again before the error is returned.
    pub async fn upload_media(
        &self,
        page_id: i32,
        upload: MediaUpload,
    ) -> AppResult<MediaFileResponse> {
        let page = pages::Entity::find_by_id(page_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Memorial page not found".to_string()))?;

        let file = upload
            .file
            .ok_or_else(|| AppError::ValidationError("No file uploaded".to_string()))?;
        if file.file_name.trim().is_empty() {
            return Err(AppError::ValidationError("No file selected".to_string()));
        }

        let media_type = validate_file(
            upload.file_type.as_deref().unwrap_or_default(),
            &file.file_name,
            file.size,
        )?;

        let premium = self.premium_service.check(page.device_id.as_deref()).await?;
        let existing = count_media(&self.pool, page.id, media_type).await?;
        check_quota(media_type, existing, premium.is_premium)?;

        let stored = self
            .storage
            .store(&file.data, &file.file_name, media_type)
            .await?;
        if stored.size != file.size {
            self.discard(&stored.public_path).await;
            return Err(AppError::InternalError(format!(
                "Upload truncated: received {} bytes, stored {}",
                file.size, stored.size
            )));
        }

        let record = match self.insert_record(page.id, media_type, &stored).await {
            Ok(record) => record,
            Err(e) => {
                self.discard(&stored.public_path).await;
                return Err(e);
            }
        };

        log::info!(
            "Uploaded {} {} ({} bytes) to page {}",
            media_type,
            record.file_path,
            record.file_size,
            page.code
        );
        Ok(record.into())
    }

    async fn insert_record(
        &self,
        page_id: i32,
        media_type: MediaType,
        stored: &StoredFile,
    ) -> AppResult<media::Model> {
        let file_size = i64::try_from(stored.size)
            .map_err(|_| AppError::InternalError(format!("File size {} out of range", stored.size)))?;

        let txn = self.pool.begin().await?;
        let record = media::ActiveModel {
            memorial_page_id: Set(page_id),
            file_type: Set(media_type),
            file_name: Set(stored.file_name.clone()),
            file_path: Set(stored.public_path.clone()),
            file_size: Set(file_size),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(record)
    }

    async fn discard(&self, public_path: &str) {
        if let Err(e) = self.storage.delete(public_path).await {
            log::error!("Failed to remove orphaned upload {public_path}: {e}");
        }
    }

    /// Removes the physical file, then the record. A missing record leaves storage untouched.
    pub async fn delete_media(&self, media_id: i32) -> AppResult<()> {
        let record = media::Entity::find_by_id(media_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Media file not found".to_string()))?;

        if !self.storage.delete(&record.file_path).await? {
            log::warn!("Media file {} was already missing from storage", record.file_path);
        }

        let txn = self.pool.begin().await?;
        record.delete(&txn).await?;
        txn.commit().await?;

        log::info!("Deleted media file {media_id}");
        Ok(())
    }
}
