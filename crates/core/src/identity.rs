//! Client identity resolution.
//!
//! The identity is the best-available caller address and is the key for both
//! rate limiting and analytics. Resolution never fails; missing inputs
//! degrade to [`UNKNOWN_IDENTITY`].

use std::net::SocketAddr;

/// Identity used when neither a forwarded-for header nor a peer address exists.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Resolve a client identity.
///
/// Takes the first comma-separated token of the forwarded-for header when it
/// is present and non-blank, otherwise the peer IP.
pub fn resolve(forwarded_for: Option<&str>, peer: Option<SocketAddr>) -> String {
    if let Some(first) = forwarded_for
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_IDENTITY.to_string(),
    }
}
