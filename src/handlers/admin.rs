use crate::models::*;
use crate::services::AdminService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Page, subscription and storage totals", body = AdminStatsResponse),
        (status = 500, description = "Database error")
    )
)]
pub async fn get_stats(admin_service: web::Data<AdminService>) -> Result<HttpResponse> {
    match admin_service.get_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/pages",
    tag = "admin",
    responses(
        (status = 200, description = "All pages, newest first", body = [AdminPageSummary])
    )
)]
pub async fn list_pages(admin_service: web::Data<AdminService>) -> Result<HttpResponse> {
    match admin_service.list_pages().await {
        Ok(pages) => Ok(HttpResponse::Ok().json(ApiResponse::success(pages))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/cleanup",
    tag = "admin",
    responses(
        (status = 200, description = "Stale pages removed", body = CleanupResponse),
        (status = 500, description = "Cleanup failed")
    )
)]
pub async fn cleanup(admin_service: web::Data<AdminService>) -> Result<HttpResponse> {
    match admin_service.cleanup().await {
        Ok(report) => {
            let message = format!("Deleted {} old memorial pages", report.deleted_count);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(report, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/stats", web::get().to(get_stats))
            .route("/pages", web::get().to(list_pages))
            .route("/cleanup", web::post().to(cleanup)),
    );
}
