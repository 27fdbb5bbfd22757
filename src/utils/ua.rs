//! Bot / crawler user-agent screening
//!
//! Cheap screen run before any ledger lookup: an obviously automated UA
//! never counts as billable. woothee handles the known-crawler taxonomy;
//! the substring list catches HTTP clients and headless tooling that ship
//! no crawler token.

use woothee::parser::Parser;

/// Substring markers (lowercase) for crawlers and scripted HTTP clients.
const BOT_UA_MARKERS: &[&str] = &[
    "bot",
    "crawl",
    "spider",
    "scrape",
    "headless",
    "phantom",
    "selenium",
    "puppeteer",
    "playwright",
    "wget",
    "curl",
    "python-requests",
    "httpx",
    "axios",
    "node-fetch",
    "go-http",
    "java/",
    "libwww",
    "apache-httpclient",
    "okhttp",
    "slurp",
    "ia_archiver",
];

/// Tokens a real browser UA always carries.
const BROWSER_TOKENS: &[&str] = &["mozilla", "chrome", "safari", "firefox", "edge", "opera"];

/// Whether a user agent looks automated.
///
/// Empty or suspiciously short strings are treated as bots: every real
/// browser sends a UA far longer than 10 bytes.
pub fn is_bot(user_agent: &str) -> bool {
    if user_agent.len() < 10 {
        return true;
    }

    let lowered = user_agent.to_lowercase();

    if !BROWSER_TOKENS.iter().any(|token| lowered.contains(token)) {
        return true;
    }

    if BOT_UA_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return true;
    }

    if let Some(parsed) = Parser::new().parse(user_agent) {
        if parsed.category == "crawler" {
            return true;
        }
    }

    false
}
