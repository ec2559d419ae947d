use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{MediaType, SubscriptionStatus};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::memorial::create_page,
        handlers::memorial::get_page,
        handlers::memorial::list_pages_by_device,
        handlers::memorial::upload_media,
        handlers::memorial::delete_media,
        handlers::premium::get_status,
        handlers::premium::subscribe,
        handlers::admin::get_stats,
        handlers::admin::list_pages,
        handlers::admin::cleanup,
    ),
    components(
        schemas(
            CreateMemorialPageRequest,
            MemorialPageResponse,
            MemorialPageSummary,
            MediaFileResponse,
            UploadMediaForm,
            MediaType,
            SubscribeRequest,
            PremiumStatusResponse,
            SubscriptionResponse,
            SubscriptionStatus,
            AdminStatsResponse,
            AdminPageSummary,
            CleanupResponse,
        )
    ),
    tags(
        (name = "memorial", description = "Memorial page API"),
        (name = "media", description = "Media upload API"),
        (name = "premium", description = "Premium subscription API"),
        (name = "admin", description = "Administration API"),
    ),
    info(
        title = "Memorial Pages API",
        version = "1.0.0",
        description = "Memorial pages backend REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
