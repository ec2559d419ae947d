pub mod admin_service;
pub mod media_service;
pub mod media_validator;
pub mod page_service;
pub mod premium_service;

pub use admin_service::*;
pub use media_service::*;
pub use page_service::*;
pub use premium_service::*;
