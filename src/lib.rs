//! Clickguard - sponsored-link click fraud prevention service
//!
//! This library provides the click ingestion and validation pipeline for
//! monetized links on a link-in-bio platform: every recorded click is
//! classified as billable or rejected with a reason, without ever slowing
//! down or changing the visible redirect.
//!
//! # Architecture
//! - `fingerprint`: environment-signal fingerprint collector
//! - `services`: context extraction, validity evaluation, ingestion
//! - `ledger`: append-only click storage (sea-orm and in-memory backends)
//! - `api`: public HTTP click endpoint
//! - `config`: configuration management
//! - `utils`: IP extraction/hashing and user-agent screening

pub mod api;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod ledger;
pub mod services;
pub mod utils;
