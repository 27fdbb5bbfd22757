//! Click context extraction
//!
//! Turns a raw inbound notification into the canonical [`ClickEvent`].
//! Pure construction, no I/O. Missing or malformed session/fingerprint
//! values never reject the request; they degrade the event to weaker
//! dedup keys and flag it as anonymous so the evaluator can apply the
//! stricter cap.

use chrono::Utc;

use crate::fingerprint::FINGERPRINT_ERROR;
use crate::ledger::ClickEvent;
use crate::utils::sha256_hex;

/// Upper bound for client-supplied opaque tokens; anything longer is
/// treated as malformed (and therefore absent).
const MAX_TOKEN_LEN: usize = 128;

/// Raw inbound click notification, as the HTTP layer hands it over.
/// The address is already hashed by the transport boundary.
#[derive(Debug, Clone)]
pub struct RawClick {
    pub link_id: String,
    pub session_id: Option<String>,
    pub fingerprint_hash: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub ip_hash: String,
}

pub struct ContextExtractor;

impl ContextExtractor {
    pub fn extract(raw: RawClick) -> ClickEvent {
        let user_agent = raw.user_agent.unwrap_or_default();

        let session_id = normalize_token(raw.session_id);
        let fingerprint_hash = normalize_token(raw.fingerprint_hash);

        // Both identity signals missing: anonymous traffic, stricter cap.
        let anonymous = session_id.is_none() && fingerprint_hash.is_none();

        // Without a client session, fall back to a compound ip+UA key so
        // the session dedup rule still has something to hold on to.
        let session_id = session_id
            .or_else(|| Some(sha256_hex(&format!("{}:{}", raw.ip_hash, user_agent))));

        ClickEvent {
            link_id: raw.link_id,
            session_id,
            ip_hash: raw.ip_hash,
            fingerprint_hash,
            user_agent,
            referrer: raw.referrer.filter(|r| !r.trim().is_empty()),
            received_at: Utc::now(),
            anonymous,
        }
    }
}

/// Trim, drop empties, sentinels and oversized values.
fn normalize_token(token: Option<String>) -> Option<String> {
    let token = token?;
    let trimmed = token.trim();
    if trimmed.is_empty() || trimmed == FINGERPRINT_ERROR || trimmed.len() > MAX_TOKEN_LEN {
        return None;
    }
    Some(trimmed.to_string())
}
