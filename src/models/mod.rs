pub mod admin;
pub mod common;
pub mod media_file;
pub mod memorial_page;
pub mod premium;

pub use admin::*;
pub use common::*;
pub use media_file::*;
pub use memorial_page::*;
pub use premium::*;
