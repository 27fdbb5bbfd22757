//! Click ingestion service
//!
//! The externally callable entry point: resolve the link, extract the
//! canonical event, evaluate it, append the record. The verdict never
//! reaches the click-originating client; only the persisted `is_valid`
//! flag separates billable from non-billable downstream.
//!
//! Failure policy (fail closed): if the ledger cannot be read the click
//! is recorded as `EVALUATION_UNAVAILABLE` rather than trusted, and if
//! even that write fails it is logged and the visible action continues.

use std::sync::Arc;

use tracing::{debug, error};

use crate::errors::{ClickguardError, Result};
use crate::ledger::{ClickLedger, ClickRecord, InvalidReason, SponsoredLink};
use crate::services::context::{ContextExtractor, RawClick};
use crate::services::evaluator::ValidityEvaluator;
use crate::services::resolver::LinkResolver;

/// What the HTTP layer needs to finish the visible action. The verdict is
/// carried for logging and tests, never for the client response.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub link: SponsoredLink,
    pub record_id: Option<i64>,
    pub is_valid: bool,
    pub reason: Option<InvalidReason>,
}

pub struct ClickIngestService {
    ledger: Arc<dyn ClickLedger>,
    resolver: Arc<dyn LinkResolver>,
    evaluator: ValidityEvaluator,
}

impl ClickIngestService {
    pub fn new(
        ledger: Arc<dyn ClickLedger>,
        resolver: Arc<dyn LinkResolver>,
        evaluator: ValidityEvaluator,
    ) -> Self {
        Self {
            ledger,
            resolver,
            evaluator,
        }
    }

    /// Ingest one click notification end to end.
    ///
    /// An unknown or inactive tracking code is the only caller-visible
    /// error (a 4xx-class input problem, the click is not recorded).
    /// Everything after resolution is absorbed internally.
    pub async fn ingest(&self, raw: RawClick) -> Result<IngestOutcome> {
        let link = self
            .resolver
            .resolve(&raw.link_id)
            .await?
            .filter(|link| link.is_active)
            .ok_or_else(|| {
                ClickguardError::not_found(format!("sponsored link not found: {}", raw.link_id))
            })?;

        let event = ContextExtractor::extract(raw);

        let verdict = match self.evaluator.evaluate(&event, self.ledger.as_ref()).await {
            Ok(verdict) => verdict,
            Err(e) => {
                // Dedup history unreadable: never mark the click valid,
                // but keep the attempt for later reconciliation.
                error!("Ledger unreachable during evaluation, failing closed: {}", e);
                Some(InvalidReason::EvaluationUnavailable)
            }
        };

        let record = match verdict {
            None => ClickRecord::valid(event),
            Some(reason) => ClickRecord::invalid(event, reason),
        };

        let record_id = match self.ledger.append(record).await {
            Ok(id) => Some(id),
            Err(e) => {
                // A storage fault must not block the visible click action.
                error!("Failed to append click record: {}", e);
                None
            }
        };

        debug!(
            link_id = %link.id,
            record_id = ?record_id,
            is_valid = verdict.is_none(),
            reason = ?verdict,
            "Click ingested"
        );

        Ok(IngestOutcome {
            link,
            record_id,
            is_valid: verdict.is_none(),
            reason: verdict,
        })
    }
}
