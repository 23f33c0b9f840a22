//! Request field extraction.
//!
//! Pulls what the capture pipeline needs out of an axum request without
//! ever rejecting it: unreadable headers become empty strings and the body
//! is read only up to a fixed byte cap.

use axum::{
    body::{Body, HttpBody},
    extract::ConnectInfo,
    http::{header, request::Parts, HeaderMap, HeaderName},
};
use snare_core::{HttpMethod, InboundRequest};
use std::net::SocketAddr;
use std::pin::Pin;
use tracing::debug;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

fn header_text(headers: &HeaderMap, name: impl AsRef<str>) -> Option<String> {
    headers
        .get(name.as_ref())
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

fn header_or_empty(headers: &HeaderMap, name: HeaderName) -> String {
    header_text(headers, name).unwrap_or_default()
}

/// Transport-level peer address, when the server was started with connect info.
pub fn peer_addr(parts: &Parts) -> Option<SocketAddr> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Everything but the body. The body is read separately so throttled
/// requests never pay for it.
pub fn inbound_head(parts: &Parts) -> InboundRequest {
    InboundRequest {
        method: HttpMethod::from(parts.method.as_str()),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().unwrap_or_default().to_string(),
        body: Vec::new(),
        forwarded_for: header_text(&parts.headers, X_FORWARDED_FOR),
        user_agent: header_or_empty(&parts.headers, header::USER_AGENT),
        referrer: header_or_empty(&parts.headers, header::REFERER),
        content_type: header_or_empty(&parts.headers, header::CONTENT_TYPE),
    }
}

/// Read at most `cap` bytes of the body. Transport errors end the read with
/// whatever arrived so far.
pub async fn read_capped(mut body: Body, cap: usize) -> Vec<u8> {
    let mut buf = Vec::new();

    while buf.len() < cap {
        match std::future::poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    let take = (cap - buf.len()).min(data.len());
                    buf.extend_from_slice(&data[..take]);
                }
            }
            Some(Err(e)) => {
                debug!(error = %e, read = buf.len(), "Body read interrupted");
                break;
            }
            None => break,
        }
    }

    buf
}
