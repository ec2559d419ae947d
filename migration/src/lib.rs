pub use sea_orm_migration::prelude::*;

mod m20251019_000001_create_memorial_pages;
mod m20251019_000002_create_media_files;
mod m20251019_000003_create_premium_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_create_memorial_pages::Migration),
            Box::new(m20251019_000002_create_media_files::Migration),
            Box::new(m20251019_000003_create_premium_subscriptions::Migration),
        ]
    }
}
