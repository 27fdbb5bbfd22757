//! Validity evaluator: the anti-fraud decision function
//!
//! Ordered rule chain, first match wins, cheapest checks first. Every rule
//! is a monotonic rejection answerable by one indexed ledger probe, so the
//! order only decides which reason gets reported, never whether a click
//! that should be rejected slips through.
//!
//! There is deliberately no per-key lock around the probes: two clicks on
//! the same dedup key racing through evaluation can both be accepted. The
//! caps are soft anti-abuse thresholds and the window is narrow, so that
//! bounded over-count is accepted instead of serializing the hot path.

use tracing::debug;

use crate::config::FraudConfig;
use crate::errors::Result;
use crate::ledger::{ClickEvent, ClickLedger, InvalidReason};
use crate::utils::ua::is_bot;

pub struct ValidityEvaluator {
    policy: FraudConfig,
}

impl ValidityEvaluator {
    pub fn new(policy: FraudConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FraudConfig {
        &self.policy
    }

    /// Classify one click against ledger history. `Ok(None)` means valid;
    /// `Ok(Some(reason))` is a recorded rejection. A ledger error
    /// propagates so the caller can fail closed.
    pub async fn evaluate(
        &self,
        event: &ClickEvent,
        ledger: &dyn ClickLedger,
    ) -> Result<Option<InvalidReason>> {
        let now = event.received_at;

        // Rule 0a: bot screen, no ledger access needed.
        if is_bot(&event.user_agent) {
            debug!(link_id = %event.link_id, "Click rejected: bot user agent");
            return Ok(Some(InvalidReason::BotUserAgent));
        }

        // Rule 0b: velocity floor. Any click from this address, valid or
        // not, inside the minimum gap.
        let gap_start = now - self.policy.min_click_gap();
        if ledger.exists_any(&event.ip_hash, gap_start).await? {
            debug!(link_id = %event.link_id, "Click rejected: velocity floor");
            return Ok(Some(InvalidReason::ClickVelocity));
        }

        let window_start = now - self.policy.session_window();

        // Rule 1: same session already counted for this link.
        if let Some(session_id) = &event.session_id {
            if ledger
                .exists_valid(session_id, &event.link_id, window_start)
                .await?
            {
                debug!(link_id = %event.link_id, "Click rejected: duplicate session");
                return Ok(Some(InvalidReason::DuplicateSession));
            }
        }

        // Rule 2: rolling 24h cap across all links for this address.
        let cap_start = now - self.policy.ip_cap_window();
        let valid_count = ledger.count_valid(&event.ip_hash, cap_start).await?;
        if valid_count >= self.policy.ip_daily_cap {
            debug!(
                link_id = %event.link_id,
                valid_count,
                "Click rejected: daily IP cap"
            );
            return Ok(Some(InvalidReason::IpDailyCapExceeded));
        }

        // Rule 3: same fingerprint counted for this link under another
        // session. Session storage was cleared to evade rule 1.
        if let Some(fingerprint) = &event.fingerprint_hash {
            if ledger
                .exists_valid_fingerprint(
                    fingerprint,
                    &event.link_id,
                    event.session_id.as_deref(),
                    window_start,
                )
                .await?
            {
                debug!(link_id = %event.link_id, "Click rejected: fingerprint replay");
                return Ok(Some(InvalidReason::FingerprintReplay));
            }
        }

        // Rule 4: anonymous traffic gets the stricter cap. Reuses the
        // rule 2 count, same window.
        if event.anonymous && valid_count >= self.policy.ip_daily_cap_anonymous {
            debug!(
                link_id = %event.link_id,
                valid_count,
                "Click rejected: anonymous cap"
            );
            return Ok(Some(InvalidReason::AnonymousCapExceeded));
        }

        Ok(None)
    }
}
