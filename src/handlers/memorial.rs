use crate::error::AppError;
use crate::models::*;
use crate::services::media_validator::MAX_VIDEO_SIZE;
use crate::services::{MediaService, PageService};
use crate::utils::{client_ip, user_agent};
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use futures_util::StreamExt;

#[utoipa::path(
    post,
    path = "/memorial-pages",
    tag = "memorial",
    request_body = CreateMemorialPageRequest,
    responses(
        (status = 201, description = "Memorial page created", body = MemorialPageResponse),
        (status = 400, description = "Missing name or duplicate code")
    )
)]
pub async fn create_page(
    page_service: web::Data<PageService>,
    req: HttpRequest,
    request: web::Json<CreateMemorialPageRequest>,
) -> Result<HttpResponse> {
    let client = ClientInfo {
        ip_address: client_ip(&req),
        user_agent: user_agent(&req),
    };

    match page_service.create_page(request.into_inner(), client).await {
        Ok(page) => Ok(HttpResponse::Created().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memorial-pages/{code}",
    tag = "memorial",
    params(("code" = String, Path, description = "Page code")),
    responses(
        (status = 200, description = "Memorial page with its media", body = MemorialPageResponse),
        (status = 404, description = "Memorial page not found")
    )
)]
pub async fn get_page(
    page_service: web::Data<PageService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match page_service.get_page_by_code(&path.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memorial-pages/by-device/{device_id}",
    tag = "memorial",
    params(("device_id" = String, Path, description = "Client device identifier")),
    responses(
        (status = 200, description = "Pages created by the device, newest first", body = [MemorialPageSummary])
    )
)]
pub async fn list_pages_by_device(
    page_service: web::Data<PageService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match page_service.list_pages_by_device(&path.into_inner()).await {
        Ok(pages) => Ok(HttpResponse::Ok().json(ApiResponse::success(pages))),
        Err(e) => Ok(e.error_response()),
    }
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::ValidationError(format!("Malformed multipart body: {e}"))
}

/// Collects the `file` and `file_type` parts. The file is buffered up to the largest size any
/// media type may have; the remainder is counted and dropped.
async fn read_upload(mut payload: Multipart) -> Result<MediaUpload, AppError> {
    let mut upload = MediaUpload::default();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(multipart_error)?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        match name.as_str() {
            "file" => {
                let mut file = UploadedFile {
                    file_name: file_name.unwrap_or_default(),
                    ..Default::default()
                };
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(multipart_error)?;
                    file.size += chunk.len() as u64;
                    let room = (MAX_VIDEO_SIZE as usize).saturating_sub(file.data.len());
                    file.data
                        .extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                upload.file = Some(file);
            }
            "file_type" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    value.extend_from_slice(&chunk.map_err(multipart_error)?);
                }
                upload.file_type = Some(String::from_utf8_lossy(&value).trim().to_string());
            }
            _ => {
                while let Some(chunk) = field.next().await {
                    chunk.map_err(multipart_error)?;
                }
            }
        }
    }

    Ok(upload)
}

#[utoipa::path(
    post,
    path = "/memorial-pages/{page_id}/media",
    tag = "media",
    params(("page_id" = i32, Path, description = "Memorial page id")),
    request_body(content = UploadMediaForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Media uploaded", body = MediaFileResponse),
        (status = 400, description = "Invalid type, extension or quota exceeded"),
        (status = 404, description = "Memorial page not found"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_media(
    media_service: web::Data<MediaService>,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let upload = match read_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => return Ok(e.error_response()),
    };

    match media_service.upload_media(path.into_inner(), upload).await {
        Ok(media) => Ok(HttpResponse::Created().json(ApiResponse::success(media))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/media/{media_id}",
    tag = "media",
    params(("media_id" = i32, Path, description = "Media file id")),
    responses(
        (status = 200, description = "File deleted successfully"),
        (status = 404, description = "Media file not found")
    )
)]
pub async fn delete_media(
    media_service: web::Data<MediaService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match media_service.delete_media(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message(
            "File deleted successfully".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn memorial_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/memorial-pages")
            .route("", web::post().to(create_page))
            .route("/by-device/{device_id}", web::get().to(list_pages_by_device))
            .route("/{page_id}/media", web::post().to(upload_media))
            .route("/{code}", web::get().to(get_page)),
    )
    .route("/media/{media_id}", web::delete().to(delete_media));
}
