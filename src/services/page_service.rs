use crate::entities::{media_file_entity as media, memorial_page_entity as pages};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::page_code::{MAX_CODE_LENGTH, generate_unique_page_code, page_code_exists};
use crate::utils::truncate_chars;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

const MAX_NAME_CHARS: usize = 120;
const MAX_DEVICE_ID_CHARS: usize = 64;
const MAX_USER_AGENT_CHARS: usize = 256;
const MAX_IP_CHARS: usize = 64;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Clone)]
pub struct PageService {
    pool: DatabaseConnection,
}

impl PageService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_page(
        &self,
        req: CreateMemorialPageRequest,
        client: ClientInfo,
    ) -> AppResult<MemorialPageResponse> {
        let name = non_empty(req.name)
            .ok_or_else(|| AppError::ValidationError("Name is required".to_string()))?;
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(AppError::ValidationError(format!(
                "Name must be at most {MAX_NAME_CHARS} characters"
            )));
        }

        let device_id = non_empty(req.device_id);
        if device_id
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DEVICE_ID_CHARS)
        {
            return Err(AppError::ValidationError(format!(
                "Device ID must be at most {MAX_DEVICE_ID_CHARS} characters"
            )));
        }

        let txn = self.pool.begin().await?;

        let code = match non_empty(req.code) {
            Some(code) => {
                if code.chars().count() > MAX_CODE_LENGTH {
                    return Err(AppError::ValidationError(format!(
                        "Code must be at most {MAX_CODE_LENGTH} characters"
                    )));
                }
                if page_code_exists(&txn, &code).await? {
                    return Err(AppError::DuplicateCode);
                }
                code
            }
            None => generate_unique_page_code(&txn).await?,
        };

        let page = pages::ActiveModel {
            code: Set(code),
            name: Set(name),
            content: Set(req.content.unwrap_or_default()),
            is_premium: Set(req.is_premium.unwrap_or(false)),
            device_id: Set(device_id),
            user_agent: Set(client
                .user_agent
                .map(|ua| truncate_chars(ua, MAX_USER_AGENT_CHARS))),
            ip_address: Set(client.ip_address.map(|ip| truncate_chars(ip, MAX_IP_CHARS))),
            created_at: Set(Utc::now()),
            last_accessed: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|err| {
            // lost the check-then-insert race
            if is_unique_violation(&err) {
                AppError::DuplicateCode
            } else {
                AppError::from(err)
            }
        })?;

        txn.commit().await?;

        log::info!("Created memorial page {} ({})", page.code, page.id);
        Ok(MemorialPageResponse::new(page, Vec::new()))
    }

    /// Looks a page up by code and stamps `last_accessed`.
    ///
    /// A failed stamp is logged and the page is still returned.
    pub async fn get_page_by_code(&self, code: &str) -> AppResult<MemorialPageResponse> {
        let page = pages::Entity::find()
            .filter(pages::Column::Code.eq(code))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Memorial page not found".to_string()))?;

        let media_files = page
            .find_related(media::Entity)
            .order_by_asc(media::Column::UploadedAt)
            .order_by_asc(media::Column::Id)
            .all(&self.pool)
            .await?;

        let mut am = page.clone().into_active_model();
        am.last_accessed = Set(Some(Utc::now()));
        let page = match am.update(&self.pool).await {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("Failed to update last_accessed for page {}: {e}", page.id);
                page
            }
        };

        Ok(MemorialPageResponse::new(
            page,
            media_files.into_iter().map(MediaFileResponse::from).collect(),
        ))
    }

    /// Pages owned by a device, newest first.
    pub async fn list_pages_by_device(&self, device_id: &str) -> AppResult<Vec<MemorialPageSummary>> {
        let list = pages::Entity::find()
            .filter(pages::Column::DeviceId.eq(device_id))
            .order_by_desc(pages::Column::CreatedAt)
            .order_by_desc(pages::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(MemorialPageSummary::from).collect())
    }
}
