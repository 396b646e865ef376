//! Best-effort client identity resolution.
//!
//! The service is deployed behind a reverse proxy, so forwarded headers
//! are trusted as-is. These are pure, total functions: they never fail
//! and never block.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolve the client address for an inbound request.
///
/// Precedence: first entry of `X-Forwarded-For` (trimmed) → the
/// transport-reported peer address → `"unknown"`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Hostname to advertise in rendered views: `X-Forwarded-Host`, then the
/// plain `Host` header.
pub fn forwarded_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-host")
        .or_else(|| headers.get("host"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
