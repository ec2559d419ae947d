use crate::models::*;
use crate::services::PremiumService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/premium/status/{device_id}",
    tag = "premium",
    params(("device_id" = String, Path, description = "Client device identifier")),
    responses(
        (status = 200, description = "Premium status of the device", body = PremiumStatusResponse)
    )
)]
pub async fn get_status(
    premium_service: web::Data<PremiumService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match premium_service.get_status(&path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/premium/subscribe",
    tag = "premium",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Mock subscription created", body = SubscriptionResponse),
        (status = 400, description = "Device ID is required")
    )
)]
pub async fn subscribe(
    premium_service: web::Data<PremiumService>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    match premium_service.subscribe(request.into_inner()).await {
        Ok(subscription) => Ok(HttpResponse::Created().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn premium_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/premium")
            .route("/status/{device_id}", web::get().to(get_status))
            .route("/subscribe", web::post().to(subscribe)),
    );
}
