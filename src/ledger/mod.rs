//! Click ledger: durable, append-only storage of click records
//!
//! The ledger is the only source of truth for "has this actor already been
//! counted". The evaluator only ever touches it through the five
//! operations on [`ClickLedger`], each backed by an index so no rule needs
//! a table scan. Reads are as consistent as the backend's isolation level;
//! a narrow double-accept race between concurrent clicks on the same dedup
//! key is tolerated (the caps are soft anti-abuse thresholds, not a
//! financial ledger).

mod memory;
mod models;
pub mod sea_orm;

pub use memory::MemoryLedger;
pub use models::{ClickEvent, ClickRecord, InvalidReason, SponsoredLink};
pub use self::sea_orm::SeaOrmLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

#[async_trait]
pub trait ClickLedger: Send + Sync {
    /// Append one record, returning its storage id. Records are never
    /// updated or deleted afterwards.
    async fn append(&self, record: ClickRecord) -> Result<i64>;

    /// Count valid records for an ip hash since `since` (all links).
    async fn count_valid(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<u64>;

    /// Whether a valid record exists for (session_id, link_id) since `since`.
    async fn exists_valid(
        &self,
        session_id: &str,
        link_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Whether a valid record exists for (fingerprint_hash, link_id) since
    /// `since` under a session id other than `excluding_session`. Catches
    /// session-storage clearing: same device, fresh session.
    async fn exists_valid_fingerprint(
        &self,
        fingerprint_hash: &str,
        link_id: &str,
        excluding_session: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Whether any record (valid or not) exists for an ip hash since
    /// `since`. Backs the click-velocity floor.
    async fn exists_any(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<bool>;
}
