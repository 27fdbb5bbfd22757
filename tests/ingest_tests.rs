//! Click endpoint tests
//!
//! End-to-end over the actix service: the response must be the redirect
//! (or 404 for unknown codes) and must never reveal the fraud verdict;
//! only the ledger contents distinguish billable from rejected clicks.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clickguard::api::click_routes;
use clickguard::config::FraudConfig;
use clickguard::errors::{ClickguardError, Result};
use clickguard::ledger::{
    ClickLedger, ClickRecord, InvalidReason, MemoryLedger, SponsoredLink,
};
use clickguard::services::{ClickIngestService, LinkResolver, MemoryResolver, ValidityEvaluator};

const BROWSER_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn sponsored_link(id: &str, active: bool) -> SponsoredLink {
    SponsoredLink {
        id: id.to_string(),
        target_url: format!("https://shop.example.com/{}", id),
        title: Some("Promo".to_string()),
        is_active: active,
    }
}

fn build_service(ledger: Arc<dyn ClickLedger>) -> (Arc<ClickIngestService>, Arc<MemoryResolver>) {
    let resolver = Arc::new(MemoryResolver::new());
    resolver.insert(sponsored_link("promo1", true));
    resolver.insert(sponsored_link("retired", false));

    let service = Arc::new(ClickIngestService::new(
        ledger,
        resolver.clone(),
        ValidityEvaluator::new(FraudConfig::default()),
    ));
    (service, resolver)
}

fn click_request(link_id: &str, session: Option<&str>) -> TestRequest {
    let uri = match session {
        Some(sid) => format!("/c/{}?sid={}&fp=fphash1", link_id, sid),
        None => format!("/c/{}", link_id),
    };
    TestRequest::get()
        .uri(&uri)
        .peer_addr("203.0.113.50:40000".parse().unwrap())
        .insert_header(("User-Agent", BROWSER_UA))
        .insert_header(("Referer", "https://bio.example.com/alice"))
}

#[actix_web::test]
async fn valid_click_redirects_and_is_recorded() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("promo1", Some("sess1")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://shop.example.com/promo1"
    );

    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_valid);
    assert_eq!(records[0].link_id, "promo1");
    assert_eq!(records[0].session_id.as_deref(), Some("sess1"));
    assert_eq!(records[0].referrer.as_deref(), Some("https://bio.example.com/alice"));
}

#[actix_web::test]
async fn unknown_code_is_404_and_not_recorded() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("missing", Some("sess1")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ledger.is_empty());
}

#[actix_web::test]
async fn inactive_link_is_404_and_not_recorded() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("retired", Some("sess1")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ledger.is_empty());
}

#[actix_web::test]
async fn rejected_click_gets_the_same_redirect_as_a_valid_one() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    // Two immediate clicks from one address: the second lands inside the
    // velocity floor and must be rejected internally.
    let first = test::call_service(&app, click_request("promo1", Some("sess1")).to_request()).await;
    let second = test::call_service(&app, click_request("promo1", Some("sess1")).to_request()).await;

    assert_eq!(first.status(), StatusCode::FOUND);
    assert_eq!(second.status(), StatusCode::FOUND);
    assert_eq!(
        first.headers().get("Location").unwrap(),
        second.headers().get("Location").unwrap()
    );

    let records = ledger.records();
    assert_eq!(records.len(), 2);
    assert!(records[0].is_valid);
    assert!(!records[1].is_valid);
    assert!(records[1].invalid_reason.is_some());
}

#[actix_web::test]
async fn anonymous_click_is_still_ingested() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("promo1", None).to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_valid);
    // Compound fallback key fills the session slot
    assert!(records[0].session_id.is_some());
    assert!(records[0].fingerprint_hash.is_none());
}

#[actix_web::test]
async fn bot_click_is_recorded_invalid_but_still_redirected() {
    let ledger = Arc::new(MemoryLedger::new());
    let (service, _) = build_service(ledger.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let req = TestRequest::get()
        .uri("/c/promo1?sid=sess1")
        .peer_addr("203.0.113.50:40000".parse().unwrap())
        .insert_header(("User-Agent", "curl/8.5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].invalid_reason, Some(InvalidReason::BotUserAgent));
}

// ---------------------------------------------------------------------------
// Fail-closed behavior when the ledger cannot be read
// ---------------------------------------------------------------------------

/// Reads fail, appends still work: evaluation must fail closed while the
/// attempt is kept for reconciliation.
struct ReadFailingLedger {
    inner: MemoryLedger,
}

#[async_trait]
impl ClickLedger for ReadFailingLedger {
    async fn append(&self, record: ClickRecord) -> Result<i64> {
        self.inner.append(record).await
    }

    async fn count_valid(&self, _ip_hash: &str, _since: DateTime<Utc>) -> Result<u64> {
        Err(ClickguardError::ledger_unavailable("reads are down"))
    }

    async fn exists_valid(
        &self,
        _session_id: &str,
        _link_id: &str,
        _since: DateTime<Utc>,
    ) -> Result<bool> {
        Err(ClickguardError::ledger_unavailable("reads are down"))
    }

    async fn exists_valid_fingerprint(
        &self,
        _fingerprint_hash: &str,
        _link_id: &str,
        _excluding_session: Option<&str>,
        _since: DateTime<Utc>,
    ) -> Result<bool> {
        Err(ClickguardError::ledger_unavailable("reads are down"))
    }

    async fn exists_any(&self, _ip_hash: &str, _since: DateTime<Utc>) -> Result<bool> {
        Err(ClickguardError::ledger_unavailable("reads are down"))
    }
}

/// Resolution itself fails, so the click never maps to a confirmed link
/// and nothing can be written for it.
struct FailingResolver;

#[async_trait]
impl LinkResolver for FailingResolver {
    async fn resolve(&self, _link_id: &str) -> Result<Option<SponsoredLink>> {
        Err(ClickguardError::database_operation("link storage is down"))
    }
}

#[actix_web::test]
async fn resolver_fault_redirects_to_the_fallback_without_a_record() {
    let ledger = Arc::new(MemoryLedger::new());
    let service = Arc::new(ClickIngestService::new(
        ledger.clone(),
        Arc::new(FailingResolver),
        ValidityEvaluator::new(FraudConfig::default()),
    ));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("promo1", Some("sess1")).to_request()).await;

    // Still a redirect, but to the platform root; no 404 and no error page
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");
    assert!(ledger.is_empty());
}

#[actix_web::test]
async fn unreadable_ledger_fails_closed_but_keeps_the_attempt() {
    let failing = Arc::new(ReadFailingLedger {
        inner: MemoryLedger::new(),
    });
    let (service, _) = build_service(failing.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(click_routes),
    )
    .await;

    let resp = test::call_service(&app, click_request("promo1", Some("sess1")).to_request()).await;

    // The visible action is untouched
    assert_eq!(resp.status(), StatusCode::FOUND);

    // But the click was never trusted
    let records = failing.inner.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_valid);
    assert_eq!(
        records[0].invalid_reason,
        Some(InvalidReason::EvaluationUnavailable)
    );
}
