//! Client identification utilities
//!
//! Derives the key that partitions rate-limit state from HTTP headers and
//! the socket address.

use axum::http::HeaderMap;
use std::fmt;
use std::net::IpAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Rate-limit partition key for one client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Key used when no address could be determined
    pub const UNKNOWN: &'static str = "unknown";

    pub fn from_ip(ip: Option<IpAddr>) -> Self {
        match ip {
            Some(ip) => Self(ip.to_string()),
            None => Self(Self::UNKNOWN.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract client IP address from headers
///
/// When `trust_proxy_headers` is set, checks X-Forwarded-For (first parseable
/// entry), then X-Real-IP, then falls back to the direct connection IP.
/// Otherwise only the direct connection IP is used.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
/// * `trust_proxy_headers` - Whether a reverse proxy sets the headers above
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_proxy_headers: bool,
) -> Option<IpAddr> {
    if !trust_proxy_headers {
        return direct_ip;
    }

    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| {
            xff.split(',')
                .find_map(|candidate| candidate.trim().parse::<IpAddr>().ok())
        });
    if forwarded.is_some() {
        return forwarded;
    }

    headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
