use crate::entities::{
    SubscriptionStatus, media_file_entity as media, memorial_page_entity as pages,
    premium_subscription_entity as subs,
};
use crate::error::AppResult;
use crate::models::*;
use crate::storage::StorageService;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Debug, FromQueryResult)]
struct StorageUsed {
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct MediaCount {
    memorial_page_id: i32,
    count: i64,
}

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    storage: StorageService,
    retention_days: i64,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection, storage: StorageService, retention_days: i64) -> Self {
        Self {
            pool,
            storage,
            retention_days,
        }
    }

    pub async fn get_stats(&self) -> AppResult<AdminStatsResponse> {
        let total_pages = pages::Entity::find().count(&self.pool).await?;
        let total_premium = subs::Entity::find()
            .filter(subs::Column::Status.eq(SubscriptionStatus::Active))
            .count(&self.pool)
            .await?;
        let total_media_files = media::Entity::find().count(&self.pool).await?;

        let used = media::Entity::find()
            .select_only()
            .column_as(
                Expr::cust("CAST(COALESCE(SUM(file_size), 0) AS BIGINT)"),
                "total",
            )
            .into_model::<StorageUsed>()
            .one(&self.pool)
            .await?
            .map_or(0, |row| row.total);

        Ok(AdminStatsResponse {
            total_pages,
            total_premium,
            total_media_files,
            storage_used: format_megabytes(used),
        })
    }

    /// Every page, newest first, with its media count.
    pub async fn list_pages(&self) -> AppResult<Vec<AdminPageSummary>> {
        let list = pages::Entity::find()
            .order_by_desc(pages::Column::CreatedAt)
            .order_by_desc(pages::Column::Id)
            .all(&self.pool)
            .await?;

        let counts: HashMap<i32, i64> = media::Entity::find()
            .select_only()
            .column(media::Column::MemorialPageId)
            .column_as(Expr::col(media::Column::Id).count(), "count")
            .group_by(media::Column::MemorialPageId)
            .into_model::<MediaCount>()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|row| (row.memorial_page_id, row.count))
            .collect();

        Ok(list
            .into_iter()
            .map(|page| {
                let media_count = counts.get(&page.id).copied().unwrap_or(0);
                AdminPageSummary::new(page, media_count)
            })
            .collect())
    }

    pub async fn cleanup(&self) -> AppResult<CleanupResponse> {
        self.cleanup_at(Utc::now()).await
    }

    /// Removes pages whose access baseline is older than the retention window.
    ///
    /// Pages that were never opened are judged by `created_at`. A page whose files or records
    /// cannot be removed is counted as failed and the run continues.
    pub async fn cleanup_at(&self, now: DateTime<Utc>) -> AppResult<CleanupResponse> {
        let cutoff = now - Duration::days(self.retention_days);

        let stale = pages::Entity::find()
            .filter(
                Condition::any()
                    .add(pages::Column::LastAccessed.lt(cutoff))
                    .add(
                        Condition::all()
                            .add(pages::Column::LastAccessed.is_null())
                            .add(pages::Column::CreatedAt.lt(cutoff)),
                    ),
            )
            .all(&self.pool)
            .await?;

        let mut report = CleanupResponse {
            deleted_count: 0,
            failed_count: 0,
        };
        for page in stale {
            match self.remove_page(&page).await {
                Ok(()) => report.deleted_count += 1,
                Err(e) => {
                    log::error!("Cleanup failed for memorial page {}: {e}", page.code);
                    report.failed_count += 1;
                }
            }
        }

        log::info!(
            "Cleanup removed {} memorial page(s), {} failed (cutoff {})",
            report.deleted_count,
            report.failed_count,
            cutoff.to_rfc3339()
        );
        Ok(report)
    }

    async fn remove_page(&self, page: &pages::Model) -> AppResult<()> {
        let files = media::Entity::find()
            .filter(media::Column::MemorialPageId.eq(page.id))
            .all(&self.pool)
            .await?;

        for file in &files {
            self.storage.delete(&file.file_path).await?;
        }

        let txn = self.pool.begin().await?;
        media::Entity::delete_many()
            .filter(media::Column::MemorialPageId.eq(page.id))
            .exec(&txn)
            .await?;
        pages::Entity::delete_by_id(page.id).exec(&txn).await?;
        txn.commit().await?;

        log::debug!(
            "Removed memorial page {} with {} media file(s), last seen {}",
            page.code,
            files.len(),
            page.access_baseline().to_rfc3339()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::entities::MediaType;
    use crate::error::AppError;
    use crate::services::{MediaService, PageService};
    use crate::storage::{LocalStorage, StorageBackend, StoredFile};
    use async_trait::async_trait;
    use sea_orm::{ActiveModelTrait, Set};
    use std::sync::Arc;

    async fn insert_page(
        db: &DatabaseConnection,
        code: &str,
        created_at: DateTime<Utc>,
        last_accessed: Option<DateTime<Utc>>,
    ) -> pages::Model {
        pages::ActiveModel {
            code: Set(code.into()),
            name: Set(code.into()),
            content: Set(String::new()),
            is_premium: Set(false),
            created_at: Set(created_at),
            last_accessed: Set(last_accessed),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn upload(file_type: &str, file_name: &str, data: &[u8]) -> MediaUpload {
        MediaUpload {
            file: Some(UploadedFile {
                file_name: file_name.into(),
                data: data.to_vec(),
                size: data.len() as u64,
            }),
            file_type: Some(file_type.into()),
        }
    }

    #[tokio::test]
    async fn test_stats_on_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let service = AdminService::new(db, Arc::new(LocalStorage::new(dir.path())), 365);

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total_pages, 0);
        assert_eq!(stats.total_premium, 0);
        assert_eq!(stats.total_media_files, 0);
        assert_eq!(stats.storage_used, "0.00MB");
    }

    #[tokio::test]
    async fn test_created_page_shows_up_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let storage: StorageService = Arc::new(LocalStorage::new(dir.path()));
        let admin = AdminService::new(db.clone(), storage.clone(), 365);
        let pages_svc = PageService::new(db.clone());
        let media_svc = MediaService::new(db.clone(), storage);

        let before = admin.get_stats().await.unwrap().total_pages;
        let page = pages_svc
            .create_page(
                CreateMemorialPageRequest {
                    name: Some("Ông Ba".into()),
                    device_id: Some("device_a".into()),
                    ..Default::default()
                },
                ClientInfo::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.code.len(), 6);

        let fetched = pages_svc.get_page_by_code(&page.code).await.unwrap();
        assert!(fetched.last_accessed.is_some());
        let by_device = pages_svc.list_pages_by_device("device_a").await.unwrap();
        assert!(by_device.iter().any(|p| p.code == page.code));

        media_svc
            .upload_media(page.id, upload("image", "a.png", &vec![0u8; 1_572_864]))
            .await
            .unwrap();

        let stats = admin.get_stats().await.unwrap();
        assert_eq!(stats.total_pages, before + 1);
        assert_eq!(stats.total_media_files, 1);
        assert_eq!(stats.storage_used, "1.50MB");

        let listing = admin.list_pages().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].media_count, 1);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first_with_counts() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let storage: StorageService = Arc::new(LocalStorage::new(dir.path()));
        let now = Utc::now();
        let older = insert_page(&db, "OLDER1", now - Duration::days(2), None).await;
        insert_page(&db, "NEWER1", now, None).await;

        let media_svc = MediaService::new(db.clone(), storage.clone());
        for name in ["a.png", "b.png"] {
            media_svc
                .upload_media(older.id, upload("image", name, b"png"))
                .await
                .unwrap();
        }

        let listing = AdminService::new(db, storage, 365).list_pages().await.unwrap();
        let codes: Vec<_> = listing.iter().map(|p| (p.code.as_str(), p.media_count)).collect();
        assert_eq!(codes, vec![("NEWER1", 0), ("OLDER1", 2)]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_stale_pages_with_their_files() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let local = Arc::new(LocalStorage::new(dir.path()));
        let storage: StorageService = local.clone();
        let now = Utc::now();

        let stale = insert_page(
            &db,
            "STALE1",
            now - Duration::days(500),
            Some(now - Duration::days(400)),
        )
        .await;
        let recent = insert_page(
            &db,
            "FRESH1",
            now - Duration::days(500),
            Some(now - Duration::days(10)),
        )
        .await;

        let media_svc = MediaService::new(db.clone(), storage.clone());
        let stale_file = media_svc
            .upload_media(stale.id, upload("video", "clip.mp4", b"mp4"))
            .await
            .unwrap();
        let recent_file = media_svc
            .upload_media(recent.id, upload("image", "a.jpg", b"jpg"))
            .await
            .unwrap();

        let admin = AdminService::new(db.clone(), storage, 365);
        let report = admin.cleanup_at(now).await.unwrap();
        assert_eq!(report.deleted_count, 1);
        assert_eq!(report.failed_count, 0);

        assert!(pages::Entity::find_by_id(stale.id).one(&db).await.unwrap().is_none());
        assert!(media::Entity::find_by_id(stale_file.id).one(&db).await.unwrap().is_none());
        assert!(!local.resolve(&stale_file.file_path).unwrap().exists());

        assert!(pages::Entity::find_by_id(recent.id).one(&db).await.unwrap().is_some());
        assert!(local.resolve(&recent_file.file_path).unwrap().exists());
        assert_eq!(recent_file.file_type, MediaType::Image);
    }

    #[tokio::test]
    async fn test_cleanup_uses_created_at_for_unopened_pages() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let now = Utc::now();
        insert_page(&db, "NEVER1", now - Duration::days(400), None).await;
        insert_page(&db, "NEVER2", now - Duration::days(5), None).await;

        let admin = AdminService::new(db.clone(), Arc::new(LocalStorage::new(dir.path())), 365);
        let report = admin.cleanup_at(now).await.unwrap();
        assert_eq!(report.deleted_count, 1);

        let remaining: Vec<_> = pages::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(remaining, vec!["NEVER2".to_string()]);
    }

    #[tokio::test]
    async fn test_cleanup_honours_retention_window() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let now = Utc::now();
        insert_page(&db, "MONTH1", now - Duration::days(60), Some(now - Duration::days(45))).await;

        let storage: StorageService = Arc::new(LocalStorage::new(dir.path()));
        let yearly = AdminService::new(db.clone(), storage.clone(), 365);
        assert_eq!(yearly.cleanup_at(now).await.unwrap().deleted_count, 0);

        let monthly = AdminService::new(db, storage, 30);
        assert_eq!(monthly.cleanup_at(now).await.unwrap().deleted_count, 1);
    }

    /// Local storage that refuses to delete one public path.
    struct StuckFileStorage {
        inner: LocalStorage,
        stuck_path: String,
    }

    #[async_trait]
    impl StorageBackend for StuckFileStorage {
        async fn store(
            &self,
            data: &[u8],
            original_filename: &str,
            media_type: MediaType,
        ) -> AppResult<StoredFile> {
            self.inner.store(data, original_filename, media_type).await
        }

        async fn delete(&self, public_path: &str) -> AppResult<bool> {
            if public_path == self.stuck_path {
                return Err(AppError::StorageError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "file is locked",
                )));
            }
            self.inner.delete(public_path).await
        }
    }

    #[tokio::test]
    async fn test_cleanup_counts_pages_whose_files_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_test_db().await;
        let local = Arc::new(LocalStorage::new(dir.path()));
        let now = Utc::now();

        let stuck = insert_page(&db, "STUCK1", now - Duration::days(500), None).await;
        let stale = insert_page(&db, "STALE1", now - Duration::days(500), None).await;

        let media_svc = MediaService::new(db.clone(), local.clone());
        let stuck_file = media_svc
            .upload_media(stuck.id, upload("image", "a.png", b"png"))
            .await
            .unwrap();
        let stale_file = media_svc
            .upload_media(stale.id, upload("image", "b.png", b"png"))
            .await
            .unwrap();

        let storage = Arc::new(StuckFileStorage {
            inner: LocalStorage::new(dir.path()),
            stuck_path: stuck_file.file_path.clone(),
        });
        let admin = AdminService::new(db.clone(), storage, 365);
        let report = admin.cleanup_at(now).await.unwrap();
        assert_eq!(report.deleted_count, 1);
        assert_eq!(report.failed_count, 1);

        assert!(pages::Entity::find_by_id(stuck.id).one(&db).await.unwrap().is_some());
        assert!(media::Entity::find_by_id(stuck_file.id).one(&db).await.unwrap().is_some());
        assert!(local.resolve(&stuck_file.file_path).unwrap().exists());

        assert!(pages::Entity::find_by_id(stale.id).one(&db).await.unwrap().is_none());
        assert!(media::Entity::find_by_id(stale_file.id).one(&db).await.unwrap().is_none());
        assert!(!local.resolve(&stale_file.file_path).unwrap().exists());
    }
}
