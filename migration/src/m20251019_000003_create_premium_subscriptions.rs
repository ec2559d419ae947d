use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PremiumSubscriptions {
    Table,
    Id,
    DeviceId,
    ExternalReference,
    Status,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PremiumSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PremiumSubscriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PremiumSubscriptions::DeviceId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PremiumSubscriptions::ExternalReference)
                            .string_len(80)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PremiumSubscriptions::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(PremiumSubscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PremiumSubscriptions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_premium_subscriptions_device_status")
                    .table(PremiumSubscriptions::Table)
                    .col(PremiumSubscriptions::DeviceId)
                    .col(PremiumSubscriptions::Status)
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
                    .table(PremiumSubscriptions::Table)
                    .to_owned(),
            )
            .await
    }
}
