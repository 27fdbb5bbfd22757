//! Client IP extraction and hashing
//!
//! The raw address only exists inside this module: it is extracted from
//! the connection (or the first X-Forwarded-For hop when the connection
//! comes from a private/loopback proxy) and immediately reduced to a
//! SHA-256 hex digest. Nothing downstream ever sees the raw address.

use std::net::IpAddr;

use actix_web::HttpRequest;
use tracing::trace;

use crate::utils::sha256_hex;

/// Check whether an IP is private or localhost.
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA), fe80::/10 (link-local), ::1
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// First hop of the X-Forwarded-For header, if parseable as an IP.
fn forwarded_ip(req: &HttpRequest) -> Option<IpAddr> {
    let header = req.headers().get("X-Forwarded-For")?.to_str().ok()?;
    let first_hop = header.split(',').next()?.trim();
    first_hop.parse::<IpAddr>().ok()
}

/// Extract the real client IP.
///
/// When the direct peer is a private or loopback address the request came
/// through a local reverse proxy, so the first X-Forwarded-For hop is
/// trusted. A public peer address is used as-is; its forwarded headers are
/// ignored since any caller can forge them.
pub fn extract_client_ip(req: &HttpRequest) -> Option<IpAddr> {
    let peer = req.peer_addr().map(|addr| addr.ip());

    match peer {
        Some(peer_ip) if is_private_or_local(&peer_ip) => {
            if let Some(forwarded) = forwarded_ip(req) {
                trace!("Using forwarded client IP behind local proxy");
                return Some(forwarded);
            }
            Some(peer_ip)
        }
        Some(peer_ip) => Some(peer_ip),
        None => forwarded_ip(req),
    }
}

/// Hash a client IP for storage. The "0.0.0.0" fallback keeps clicks with
/// no resolvable peer address (unix sockets, some test rigs) flowing into
/// the pipeline under one bucket instead of dropping them.
pub fn hash_client_ip(ip: Option<IpAddr>) -> String {
    match ip {
        Some(ip) => sha256_hex(&ip.to_string()),
        None => sha256_hex("0.0.0.0"),
    }
}
