pub mod filename;
pub mod page_code;
pub mod request;

pub use filename::{file_extension, secure_filename};
pub use page_code::generate_unique_page_code;
pub use request::{client_ip, truncate_chars, user_agent};
