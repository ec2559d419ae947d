//! Upload admission rules: type, extension, size and per-page quota.
//!
//! Nothing here writes. The premium flag is evaluated by the caller so that the lazy expiry
//! side effect stays outside the validator.

use crate::entities::{MediaType, media_file_entity as media};
use crate::error::{AppError, AppResult};
use crate::utils::file_extension;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];
pub const ALLOWED_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "wmv"];

pub const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;
pub const MAX_VIDEO_SIZE: u64 = 30 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaQuota {
    pub images: u64,
    pub videos: u64,
}

pub const FREE_QUOTA: MediaQuota = MediaQuota {
    images: 3,
    videos: 1,
};
pub const PREMIUM_QUOTA: MediaQuota = MediaQuota {
    images: 10,
    videos: 3,
};

impl MediaQuota {
    pub fn for_tier(is_premium: bool) -> Self {
        if is_premium { PREMIUM_QUOTA } else { FREE_QUOTA }
    }

    pub fn limit(&self, media_type: MediaType) -> u64 {
        match media_type {
            MediaType::Image => self.images,
            MediaType::Video => self.videos,
        }
    }
}

pub fn allowed_extensions(media_type: MediaType) -> &'static [&'static str] {
    match media_type {
        MediaType::Image => &ALLOWED_IMAGE_EXTENSIONS,
        MediaType::Video => &ALLOWED_VIDEO_EXTENSIONS,
    }
}

pub fn max_size(media_type: MediaType) -> u64 {
    match media_type {
        MediaType::Image => MAX_IMAGE_SIZE,
        MediaType::Video => MAX_VIDEO_SIZE,
    }
}

/// Type, extension and size rules, checked in that order.
pub fn validate_file(file_type: &str, filename: &str, size: u64) -> AppResult<MediaType> {
    let media_type = MediaType::parse(file_type).ok_or(AppError::InvalidFileType)?;

    let allowed = file_extension(filename)
        .is_some_and(|ext| allowed_extensions(media_type).contains(&ext.as_str()));
    if !allowed {
        return Err(AppError::DisallowedExtension);
    }

    if size > max_size(media_type) {
        let msg = match media_type {
            MediaType::Image => "Image file too large (max 5MB)",
            MediaType::Video => "Video file too large (max 30MB)",
        };
        return Err(AppError::FileTooLarge(msg.to_string()));
    }

    Ok(media_type)
}

/// Rejects the upload when the page already holds its quota of `media_type`.
pub fn check_quota(media_type: MediaType, existing: u64, is_premium: bool) -> AppResult<()> {
    let limit = MediaQuota::for_tier(is_premium).limit(media_type);
    if existing >= limit {
        return Err(AppError::QuotaExceeded(format!(
            "Maximum {limit} {media_type}s allowed"
        )));
    }
    Ok(())
}

pub async fn count_media<C: ConnectionTrait>(
    conn: &C,
    page_id: i32,
    media_type: MediaType,
) -> AppResult<u64> {
    let count = media::Entity::find()
        .filter(media::Column::MemorialPageId.eq(page_id))
        .filter(media::Column::FileType.eq(media_type))
        .count(conn)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_type() {
        assert!(matches!(
            validate_file("audio", "song.mp3", 10),
            Err(AppError::InvalidFileType)
        ));
        assert!(matches!(
            validate_file("Image", "a.png", 10),
            Err(AppError::InvalidFileType)
        ));
    }

    #[test]
    fn test_rejects_disallowed_extension_regardless_of_size() {
        assert!(matches!(
            validate_file("image", "a.txt", 1),
            Err(AppError::DisallowedExtension)
        ));
        assert!(matches!(
            validate_file("image", "a.txt", MAX_IMAGE_SIZE * 4),
            Err(AppError::DisallowedExtension)
        ));
        assert!(matches!(
            validate_file("video", "clip.png", 1),
            Err(AppError::DisallowedExtension)
        ));
        assert!(matches!(
            validate_file("image", "noextension", 1),
            Err(AppError::DisallowedExtension)
        ));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(validate_file("image", "PHOTO.JPEG", 1).unwrap(), MediaType::Image);
        assert_eq!(validate_file("video", "Clip.MoV", 1).unwrap(), MediaType::Video);
    }

    #[test]
    fn test_size_ceilings() {
        assert!(validate_file("image", "a.png", MAX_IMAGE_SIZE).is_ok());
        let err = validate_file("image", "a.png", MAX_IMAGE_SIZE + 1).unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge(ref msg) if msg == "Image file too large (max 5MB)"));

        assert!(validate_file("video", "a.mp4", MAX_VIDEO_SIZE).is_ok());
        let err = validate_file("video", "a.mp4", MAX_VIDEO_SIZE + 1).unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge(ref msg) if msg == "Video file too large (max 30MB)"));
    }

    #[test]
    fn test_quota_tiers() {
        assert!(check_quota(MediaType::Image, 2, false).is_ok());
        let err = check_quota(MediaType::Image, 3, false).unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded(ref msg) if msg == "Maximum 3 images allowed"));
        assert!(check_quota(MediaType::Image, 3, true).is_ok());
        assert!(check_quota(MediaType::Image, 9, true).is_ok());
        let err = check_quota(MediaType::Image, 10, true).unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded(ref msg) if msg == "Maximum 10 images allowed"));

        let err = check_quota(MediaType::Video, 1, false).unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded(ref msg) if msg == "Maximum 1 videos allowed"));
        assert!(check_quota(MediaType::Video, 2, true).is_ok());
        assert!(check_quota(MediaType::Video, 3, true).is_err());
    }
}
