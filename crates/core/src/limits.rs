//! Size and rate limits for the capture pipeline.
//!
//! These bound both memory per request and the size of each stored record.
//! All string limits are in characters, not bytes.

// === Classification Inputs ===

/// Query string max length seen by the classifier and stored in the event.
pub const MAX_QUERY_CHARS: usize = 1000;

/// Body max length seen by the classifier.
pub const MAX_BODY_CHARS: usize = 2000;

/// Raw body bytes read off the wire before decoding.
///
/// Four bytes per char covers any UTF-8 input that decodes to
/// `MAX_BODY_CHARS` characters.
pub const MAX_BODY_BYTES: usize = MAX_BODY_CHARS * 4;

// === Stored Fields ===

/// Body sample stored in the event.
pub const BODY_SAMPLE_CHARS: usize = 400;

/// User agent string max length.
pub const MAX_USER_AGENT_CHARS: usize = 512;

/// Referrer max length. Matches the HTTP Referer header limit.
pub const MAX_REFERRER_CHARS: usize = 2048;

/// Content type max length.
pub const MAX_CONTENT_TYPE_CHARS: usize = 256;

/// Path max length stored in the event.
pub const MAX_PATH_CHARS: usize = 2048;

// === Rate Limiting ===

/// Requests admitted per identity per UTC minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Minutes a rate window is retained before eviction.
pub const DEFAULT_WINDOW_RETENTION_MINUTES: i64 = 2;

// === Aggregation ===

/// Rows kept in each ranked frequency table.
pub const DEFAULT_TOP_N: usize = 20;

/// Truncate a string to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
