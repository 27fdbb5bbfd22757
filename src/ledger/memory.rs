//! In-memory ledger backend
//!
//! Index-free reference implementation of [`ClickLedger`]. Used by the
//! integration tests and usable as a throwaway backend for local
//! development (records do not survive a restart).

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::errors::Result;
use crate::ledger::{ClickLedger, ClickRecord};

pub struct MemoryLedger {
    records: RwLock<Vec<(i64, ClickRecord)>>,
    next_id: AtomicI64,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Snapshot of all stored records, in append order.
    pub fn records(&self) -> Vec<ClickRecord> {
        self.records
            .read()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<ClickRecord> {
        self.records
            .read()
            .iter()
            .find(|(record_id, _)| *record_id == id)
            .map(|(_, record)| record.clone())
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ClickLedger for MemoryLedger {
    async fn append(&self, record: ClickRecord) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.records.write().push((id, record));
        Ok(id)
    }

    async fn count_valid(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<u64> {
        let count = self
            .records
            .read()
            .iter()
            .filter(|(_, r)| r.is_valid && r.ip_hash == ip_hash && r.created_at >= since)
            .count();
        Ok(count as u64)
    }

    async fn exists_valid(
        &self,
        session_id: &str,
        link_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.records.read().iter().any(|(_, r)| {
            r.is_valid
                && r.link_id == link_id
                && r.session_id.as_deref() == Some(session_id)
                && r.created_at >= since
        }))
    }

    async fn exists_valid_fingerprint(
        &self,
        fingerprint_hash: &str,
        link_id: &str,
        excluding_session: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.records.read().iter().any(|(_, r)| {
            r.is_valid
                && r.link_id == link_id
                && r.fingerprint_hash.as_deref() == Some(fingerprint_hash)
                && r.created_at >= since
                && match excluding_session {
                    Some(session_id) => r.session_id.as_deref() != Some(session_id),
                    None => true,
                }
        }))
    }

    async fn exists_any(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<bool> {
        Ok(self
            .records
            .read()
            .iter()
            .any(|(_, r)| r.ip_hash == ip_hash && r.created_at >= since))
    }
}
