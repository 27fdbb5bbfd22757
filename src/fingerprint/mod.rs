//! Fingerprint collector
//!
//! Reduces a fixed-order bundle of low-entropy environment signals to one
//! opaque SHA-256 hex digest. The digest is a weak persistent identity
//! used when session storage is cleared; it is not a defense against an
//! adversary who spoofs every signal, it only raises the cost of naive
//! duplicate-click scripting.
//!
//! Signals that cannot be read are replaced by a fixed sentinel so the
//! digest stays deterministic, and a failing source degrades to the
//! `fp-error` sentinel instead of surfacing an error: a degraded
//! fingerprint is always preferable to blocking the click.
//!
//! The collector is session-scoped, not process-global: one instance per
//! client session, digest computed on first use and cached for the
//! session's lifetime.

mod source;

pub use source::{HostSignalSource, SignalBundle, SignalSource};

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use crate::utils::sha256_hex;

/// Substitute for any single signal that cannot be read.
pub const SIGNAL_UNAVAILABLE: &str = "unavailable";

/// Returned when the signal source fails as a whole.
pub const FINGERPRINT_ERROR: &str = "fp-error";

pub struct FingerprintCollector {
    source: Arc<dyn SignalSource>,
    cached: OnceCell<String>,
}

impl FingerprintCollector {
    pub fn new(source: Arc<dyn SignalSource>) -> Self {
        Self {
            source,
            cached: OnceCell::new(),
        }
    }

    /// The session's fingerprint digest. Computed once; later calls return
    /// the cached value even if the environment has drifted since.
    pub fn digest(&self) -> &str {
        self.cached.get_or_init(|| match self.source.collect() {
            Ok(bundle) => sha256_hex(&bundle.join()),
            Err(e) => {
                warn!("Fingerprint signal collection failed: {}", e);
                FINGERPRINT_ERROR.to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl SignalSource for CountingSource {
        fn collect(&self) -> anyhow::Result<SignalBundle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SignalBundle::default())
        }
    }

    struct FailingSource;

    impl SignalSource for FailingSource {
        fn collect(&self) -> anyhow::Result<SignalBundle> {
            anyhow::bail!("environment not readable")
        }
    }

    #[test]
    fn digest_is_cached_per_collector() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let collector = FingerprintCollector::new(source.clone());

        let first = collector.digest().to_string();
        let second = collector.digest().to_string();

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn digest_is_hex_of_fixed_length() {
        let collector = FingerprintCollector::new(Arc::new(HostSignalSource));
        let digest = collector.digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn failing_source_degrades_to_sentinel() {
        let collector = FingerprintCollector::new(Arc::new(FailingSource));
        assert_eq!(collector.digest(), FINGERPRINT_ERROR);
    }

    #[test]
    fn separate_sessions_recompute_independently() {
        let a = FingerprintCollector::new(Arc::new(HostSignalSource));
        let b = FingerprintCollector::new(Arc::new(HostSignalSource));
        // Same host, same signals, same digest; but each collector
        // computed its own.
        assert_eq!(a.digest(), b.digest());
    }
}
