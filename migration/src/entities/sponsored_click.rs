//! Sponsored click ledger entity
//!
//! Rows are append-only: corrections are new rows, never updates.
//! `is_valid == false` iff `invalid_reason` is set.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sponsored_clicks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub link_id: String,
    pub session_id: Option<String>,
    /// SHA-256 hex of the client address, hashed at the transport boundary
    pub ip_hash: String,
    pub fingerprint_hash: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    pub is_valid: bool,
    pub invalid_reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
