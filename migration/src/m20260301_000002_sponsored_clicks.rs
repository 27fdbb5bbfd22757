//! Sponsored clicks ledger migration
//!
//! Creates the append-only `sponsored_clicks` table. Every ingested click
//! lands here exactly once, valid or not. The indexes back the fraud rule
//! lookups so each rule is an indexed range probe:
//! - (session_id, created_at): session dedup window
//! - (ip_hash, is_valid, created_at): rolling IP cap counting
//! - (ip_hash, created_at): click-velocity probe (any validity)
//! - (fingerprint_hash, link_id, created_at): fingerprint replay

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SponsoredClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SponsoredClicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::LinkId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::SessionId)
                            .string_len(128)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::IpHash)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::FingerprintHash)
                            .string_len(64)
                            .null(),
                    )
                    .col(ColumnDef::new(SponsoredClicks::UserAgent).text().not_null())
                    .col(ColumnDef::new(SponsoredClicks::Referrer).text().null())
                    .col(
                        ColumnDef::new(SponsoredClicks::IsValid)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::InvalidReason)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SponsoredClicks::CreatedAt)
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
                    .name("idx_sponsored_clicks_session_time")
                    .table(SponsoredClicks::Table)
                    .col(SponsoredClicks::SessionId)
                    .col(SponsoredClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sponsored_clicks_ip_valid_time")
                    .table(SponsoredClicks::Table)
                    .col(SponsoredClicks::IpHash)
                    .col(SponsoredClicks::IsValid)
                    .col(SponsoredClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sponsored_clicks_ip_time")
                    .table(SponsoredClicks::Table)
                    .col(SponsoredClicks::IpHash)
                    .col(SponsoredClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sponsored_clicks_fp_link_time")
                    .table(SponsoredClicks::Table)
                    .col(SponsoredClicks::FingerprintHash)
                    .col(SponsoredClicks::LinkId)
                    .col(SponsoredClicks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sponsored_clicks_fp_link_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sponsored_clicks_ip_time").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sponsored_clicks_ip_valid_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sponsored_clicks_session_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SponsoredClicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SponsoredClicks {
    #[sea_orm(iden = "sponsored_clicks")]
    Table,
    Id,
    LinkId,
    SessionId,
    IpHash,
    FingerprintHash,
    UserAgent,
    Referrer,
    IsValid,
    InvalidReason,
    CreatedAt,
}
