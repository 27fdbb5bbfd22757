//! Public click notification endpoint
//!
//! `GET /c/{link_id}?sid=..&fp=..` is unauthenticated, called by bio pages
//! for every sponsored-link click. The response is always the redirect to
//! the destination (404 only when the tracking code does not resolve);
//! the fraud verdict is never observable from outside.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::ClickguardError;
use crate::services::{ClickIngestService, RawClick};
use crate::utils::ip::{extract_client_ip, hash_client_ip};

/// Where clicks land when the destination cannot be determined (internal
/// fault after a valid-looking request). Mirrors the platform root.
///
/// A resolver-side storage fault is the one path that leaves no ledger
/// row: the tracking code was never confirmed against a real link, so
/// there is no link_id that could be written for later reconciliation.
const FALLBACK_REDIRECT: &str = "/";

#[derive(Debug, Deserialize)]
pub struct ClickQuery {
    /// Client session id (cookie-backed on the bio page)
    pub sid: Option<String>,
    /// Client-computed fingerprint digest
    pub fp: Option<String>,
}

pub struct ClickService {}

impl ClickService {
    pub async fn handle_click(
        req: HttpRequest,
        path: web::Path<String>,
        query: web::Query<ClickQuery>,
        ingest: web::Data<Arc<ClickIngestService>>,
    ) -> impl Responder {
        let link_id = path.into_inner();
        if link_id.is_empty() {
            return Self::not_found_response();
        }

        let query = query.into_inner();
        let ip_hash = hash_client_ip(extract_client_ip(&req));

        let raw = RawClick {
            link_id,
            session_id: query.sid,
            fingerprint_hash: query.fp,
            user_agent: req
                .headers()
                .get("User-Agent")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string()),
            referrer: req
                .headers()
                .get("Referer")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string()),
            ip_hash,
        };

        // Spawned so a client disconnect cannot cancel the bookkeeping:
        // the redirect may already have happened on the client side.
        let service = ingest.get_ref().clone();
        let outcome = tokio::spawn(async move { service.ingest(raw).await }).await;

        match outcome {
            Ok(Ok(outcome)) => {
                debug!(link_id = %outcome.link.id, "Redirecting sponsored click");
                Self::redirect_response(&outcome.link.target_url)
            }
            Ok(Err(ClickguardError::NotFound(msg))) => {
                debug!("Click on unresolvable tracking code: {}", msg);
                Self::not_found_response()
            }
            Ok(Err(e)) => {
                // Resolution failed for an internal reason. Still answer
                // with a generic redirect, never an error page.
                error!("Click ingestion failed: {}", e);
                Self::redirect_response(FALLBACK_REDIRECT)
            }
            Err(e) => {
                error!("Click ingestion task panicked: {}", e);
                Self::redirect_response(FALLBACK_REDIRECT)
            }
        }
    }

    fn redirect_response(location: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-store"))
            .finish()
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}

pub fn click_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/c/{link_id}", web::get().to(ClickService::handle_click));
}
