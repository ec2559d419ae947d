use sea_orm_migration::prelude::*;

use crate::m20251019_000001_create_memorial_pages::MemorialPages;

#[derive(DeriveIden)]
enum MediaFiles {
    Table,
    Id,
    MemorialPageId,
    FileType,
    FileName,
    FilePath,
    FileSize,
    UploadedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaFiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MediaFiles::MemorialPageId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaFiles::FileType).string_len(10).not_null())
                    .col(ColumnDef::new(MediaFiles::FileName).string_len(255).not_null())
                    .col(ColumnDef::new(MediaFiles::FilePath).string_len(255).not_null())
                    .col(ColumnDef::new(MediaFiles::FileSize).big_integer().not_null())
                    .col(
                        ColumnDef::new(MediaFiles::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_files_memorial_page")
                            .from(MediaFiles::Table, MediaFiles::MemorialPageId)
                            .to(MemorialPages::Table, MemorialPages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_files_page")
                    .table(MediaFiles::Table)
                    .col(MediaFiles::MemorialPageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(MediaFiles::Table).to_owned())
            .await
    }
}
