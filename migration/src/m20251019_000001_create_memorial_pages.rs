use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum MemorialPages {
    Table,
    Id,
    Code,
    Name,
    Content,
    IsPremium,
    DeviceId,
    UserAgent,
    IpAddress,
    CreatedAt,
    LastAccessed,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemorialPages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemorialPages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MemorialPages::Code).string_len(20).not_null())
                    .col(ColumnDef::new(MemorialPages::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(MemorialPages::Content)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MemorialPages::IsPremium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(MemorialPages::DeviceId).string_len(64).null())
                    .col(ColumnDef::new(MemorialPages::UserAgent).string_len(256).null())
                    .col(ColumnDef::new(MemorialPages::IpAddress).string_len(64).null())
                    .col(
                        ColumnDef::new(MemorialPages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MemorialPages::LastAccessed)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // the unique index is what actually guarantees code uniqueness
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memorial_pages_code")
                    .table(MemorialPages::Table)
                    .col(MemorialPages::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memorial_pages_device")
                    .table(MemorialPages::Table)
                    .col(MemorialPages::DeviceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memorial_pages_last_accessed")
                    .table(MemorialPages::Table)
                    .col(MemorialPages::LastAccessed)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(MemorialPages::Table)
                    .to_owned(),
            )
            .await
    }
}
