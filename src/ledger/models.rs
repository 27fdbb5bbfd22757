//! Click pipeline data model
//!
//! `ClickEvent` is the ephemeral, canonical form of one inbound click.
//! `ClickRecord` is the persistent, append-only ledger row. Records are
//! constructed through `ClickRecord::valid` / `ClickRecord::invalid` so the
//! `is_valid` / `invalid_reason` mutual exclusion cannot be violated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ClickguardError, Result};

use migration::entities::sponsored_click;

/// Why a click was rejected. Persisted as an upper-snake string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidReason {
    BotUserAgent,
    ClickVelocity,
    DuplicateSession,
    IpDailyCapExceeded,
    FingerprintReplay,
    AnonymousCapExceeded,
    EvaluationUnavailable,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::BotUserAgent => "BOT_USER_AGENT",
            InvalidReason::ClickVelocity => "CLICK_VELOCITY",
            InvalidReason::DuplicateSession => "DUPLICATE_SESSION",
            InvalidReason::IpDailyCapExceeded => "IP_DAILY_CAP_EXCEEDED",
            InvalidReason::FingerprintReplay => "FINGERPRINT_REPLAY",
            InvalidReason::AnonymousCapExceeded => "ANONYMOUS_CAP_EXCEEDED",
            InvalidReason::EvaluationUnavailable => "EVALUATION_UNAVAILABLE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOT_USER_AGENT" => Some(InvalidReason::BotUserAgent),
            "CLICK_VELOCITY" => Some(InvalidReason::ClickVelocity),
            "DUPLICATE_SESSION" => Some(InvalidReason::DuplicateSession),
            "IP_DAILY_CAP_EXCEEDED" => Some(InvalidReason::IpDailyCapExceeded),
            "FINGERPRINT_REPLAY" => Some(InvalidReason::FingerprintReplay),
            "ANONYMOUS_CAP_EXCEEDED" => Some(InvalidReason::AnonymousCapExceeded),
            "EVALUATION_UNAVAILABLE" => Some(InvalidReason::EvaluationUnavailable),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical inbound click, built by the context extractor and consumed
/// within a single evaluation. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: String,
    /// Client-supplied session id, or the compound ip+UA fallback key
    pub session_id: Option<String>,
    /// One-way hash of the caller's address; the raw address never gets here
    pub ip_hash: String,
    pub fingerprint_hash: Option<String>,
    pub user_agent: String,
    pub referrer: Option<String>,
    /// Server-assigned, authoritative. Client time is never trusted.
    pub received_at: DateTime<Utc>,
    /// True when the client supplied neither a session id nor a fingerprint
    pub anonymous: bool,
}

/// One row of the append-only click ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    pub link_id: String,
    pub session_id: Option<String>,
    pub ip_hash: String,
    pub fingerprint_hash: Option<String>,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub is_valid: bool,
    pub invalid_reason: Option<InvalidReason>,
    pub created_at: DateTime<Utc>,
}

impl ClickRecord {
    pub fn valid(event: ClickEvent) -> Self {
        Self::build(event, None)
    }

    pub fn invalid(event: ClickEvent, reason: InvalidReason) -> Self {
        Self::build(event, Some(reason))
    }

    fn build(event: ClickEvent, reason: Option<InvalidReason>) -> Self {
        ClickRecord {
            link_id: event.link_id,
            session_id: event.session_id,
            ip_hash: event.ip_hash,
            fingerprint_hash: event.fingerprint_hash,
            user_agent: event.user_agent,
            referrer: event.referrer,
            is_valid: reason.is_none(),
            invalid_reason: reason,
            created_at: event.received_at,
        }
    }

    /// Rebuild from a stored row, re-checking the validity invariant.
    /// A row violating it means the table was written by something else.
    pub fn from_model(model: sponsored_click::Model) -> Result<Self> {
        let invalid_reason = match model.invalid_reason.as_deref() {
            Some(raw) => Some(InvalidReason::parse(raw).ok_or_else(|| {
                ClickguardError::validation(format!("unknown invalid_reason: {}", raw))
            })?),
            None => None,
        };

        if model.is_valid != invalid_reason.is_none() {
            return Err(ClickguardError::validation(format!(
                "click record {} violates is_valid/invalid_reason exclusivity",
                model.id
            )));
        }

        Ok(ClickRecord {
            link_id: model.link_id,
            session_id: model.session_id,
            ip_hash: model.ip_hash,
            fingerprint_hash: model.fingerprint_hash,
            user_agent: model.user_agent,
            referrer: model.referrer,
            is_valid: model.is_valid,
            invalid_reason,
            created_at: model.created_at,
        })
    }
}

/// A resolved sponsored link, as returned by the link resolution collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredLink {
    pub id: String,
    pub target_url: String,
    pub title: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ClickEvent {
        ClickEvent {
            link_id: "lnk1".into(),
            session_id: Some("sess1".into()),
            ip_hash: "aa".repeat(32),
            fingerprint_hash: Some("fp1".into()),
            user_agent: "Mozilla/5.0 test".into(),
            referrer: None,
            received_at: Utc::now(),
            anonymous: false,
        }
    }

    #[test]
    fn valid_record_carries_no_reason() {
        let record = ClickRecord::valid(event());
        assert!(record.is_valid);
        assert!(record.invalid_reason.is_none());
    }

    #[test]
    fn invalid_record_carries_its_reason() {
        let record = ClickRecord::invalid(event(), InvalidReason::DuplicateSession);
        assert!(!record.is_valid);
        assert_eq!(record.invalid_reason, Some(InvalidReason::DuplicateSession));
    }

    #[test]
    fn reason_strings_round_trip() {
        for reason in [
            InvalidReason::BotUserAgent,
            InvalidReason::ClickVelocity,
            InvalidReason::DuplicateSession,
            InvalidReason::IpDailyCapExceeded,
            InvalidReason::FingerprintReplay,
            InvalidReason::AnonymousCapExceeded,
            InvalidReason::EvaluationUnavailable,
        ] {
            assert_eq!(InvalidReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(InvalidReason::parse("SOMETHING_ELSE"), None);
    }

    #[test]
    fn from_model_rejects_inconsistent_rows() {
        let model = sponsored_click::Model {
            id: 1,
            link_id: "lnk1".into(),
            session_id: None,
            ip_hash: "aa".repeat(32),
            fingerprint_hash: None,
            user_agent: "ua".into(),
            referrer: None,
            is_valid: true,
            invalid_reason: Some("DUPLICATE_SESSION".into()),
            created_at: Utc::now(),
        };
        assert!(ClickRecord::from_model(model).is_err());
    }
}
