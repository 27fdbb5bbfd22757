//! Sponsored links table migration
//!
//! Creates the `sponsored_links` table: the read-only resolution surface
//! for tracking codes. Rows are owned by the surrounding application's
//! link storage; this service only ever reads them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SponsoredLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SponsoredLinks::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SponsoredLinks::TargetUrl)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SponsoredLinks::Title).string_len(255).null())
                    .col(
                        ColumnDef::new(SponsoredLinks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SponsoredLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sponsored_links_active")
                    .table(SponsoredLinks::Table)
                    .col(SponsoredLinks::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sponsored_links_active").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SponsoredLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SponsoredLinks {
    #[sea_orm(iden = "sponsored_links")]
    Table,
    Id,
    TargetUrl,
    Title,
    IsActive,
    CreatedAt,
}
