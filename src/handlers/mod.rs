pub mod admin;
pub mod memorial;
pub mod premium;


pub use admin::admin_config;
pub use memorial::memorial_config;
pub use premium::premium_config;

use crate::error::AppError;
use actix_web::web;

/// JSON bodies that fail to parse are reported with the usual error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid JSON body: {err}")).into()
    })
}

/// Every API route, mounted by the caller under `/api`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(memorial_config)
        .configure(premium_config)
        .configure(admin_config);
}
