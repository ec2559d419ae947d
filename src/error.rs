use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use crate::models::ApiResponse;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Code already exists")]
    DuplicateCode,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("File type not allowed")]
    DisallowedExtension,

    #[error("{0}")]
    FileTooLarge(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Message placed in the `error` field of the response envelope.
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::FileTooLarge(msg)
            | AppError::QuotaExceeded(msg) => msg.clone(),
            AppError::DuplicateCode | AppError::InvalidFileType | AppError::DisallowedExtension => {
                self.to_string()
            }
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::StorageError(_) => "Storage error".to_string(),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::DuplicateCode
            | AppError::InvalidFileType
            | AppError::DisallowedExtension
            | AppError::QuotaExceeded(_) => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log::error!("{self}");
        } else if status_code != StatusCode::NOT_FOUND {
            log::warn!("Rejected request: {self}");
        }

        HttpResponse::build(status_code).json(ApiResponse::error(self.client_message()))
    }
}
