pub mod media_files;
pub mod memorial_pages;
pub mod premium_subscriptions;

pub use media_files::MediaType;
pub use premium_subscriptions::SubscriptionStatus;

pub use media_files as media_file_entity;
pub use memorial_pages as memorial_page_entity;
pub use premium_subscriptions as premium_subscription_entity;
