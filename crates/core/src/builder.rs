//! Event assembly.
//!
//! Turns a captured request plus the pipeline decisions into a bounded,
//! redacted [`Event`]. Persistence is the sink's job.

use percent_encoding::percent_decode_str;
use uuid::Uuid;

use crate::clock::Clock;
use crate::events::{Classification, Event, HttpMethod, Outcome};
use crate::limits::{
    truncate_chars, BODY_SAMPLE_CHARS, MAX_BODY_CHARS, MAX_CONTENT_TYPE_CHARS, MAX_PATH_CHARS,
    MAX_QUERY_CHARS, MAX_REFERRER_CHARS, MAX_USER_AGENT_CHARS,
};
use crate::redact::{redact_body, redact_pairs, Credentials};

/// Everything the pipeline needs from an inbound request.
///
/// `body` holds raw bytes already capped at the transport layer.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: String,
    pub body: Vec<u8>,
    pub forwarded_for: Option<String>,
    pub user_agent: String,
    pub referrer: String,
    pub content_type: String,
}

impl InboundRequest {
    /// Path with percent-escapes decoded, for classification only. The
    /// stored event keeps the raw path.
    pub fn path_text(&self) -> String {
        let path = truncate_chars(&self.path, MAX_PATH_CHARS);
        percent_decode_str(&path).decode_utf8_lossy().into_owned()
    }

    /// Query string as seen by the classifier.
    pub fn query_text(&self) -> String {
        truncate_chars(&self.query, MAX_QUERY_CHARS)
    }

    /// Body decoded best-effort and capped for classification.
    pub fn body_text(&self) -> String {
        truncate_chars(&String::from_utf8_lossy(&self.body), MAX_BODY_CHARS)
    }

    /// Credentials submitted through a login form, if any.
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_body(&self.content_type, &self.body_text())
    }
}

/// HTTP status answered for an outcome. POSTs to a decoy always fail auth.
pub fn response_status(outcome: Outcome, method: &HttpMethod) -> u16 {
    match outcome {
        Outcome::Served if method.is_post() => 401,
        Outcome::Served => 200,
        Outcome::Throttled => 429,
        Outcome::NotFound => 404,
    }
}

/// Builds events from captured requests.
pub struct EventBuilder;

impl EventBuilder {
    /// Build the record for a classified request.
    pub fn build(
        request: &InboundRequest,
        identity: &str,
        classification: Classification,
        outcome: Outcome,
        clock: &dyn Clock,
    ) -> Event {
        let body = request.body_text();
        let credential_digest = request
            .credentials()
            .map(|creds| creds.digest())
            .unwrap_or_default();

        Event {
            body_sample: truncate_chars(&redact_body(&request.content_type, &body), BODY_SAMPLE_CHARS),
            classification: Some(classification),
            credential_digest,
            ..Self::base(request, identity, outcome, clock)
        }
    }

    /// Build the record for a throttled request. The body is never read and
    /// no classification is attached.
    pub fn throttled(request: &InboundRequest, identity: &str, clock: &dyn Clock) -> Event {
        Self::base(request, identity, Outcome::Throttled, clock)
    }

    fn base(request: &InboundRequest, identity: &str, outcome: Outcome, clock: &dyn Clock) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            timestamp: clock.now(),
            client_identity: identity.to_string(),
            method: request.method.clone(),
            path: truncate_chars(&request.path, MAX_PATH_CHARS),
            query_string: redact_pairs(&request.query_text()),
            user_agent: truncate_chars(&request.user_agent, MAX_USER_AGENT_CHARS),
            referrer: truncate_chars(&request.referrer, MAX_REFERRER_CHARS),
            content_type: truncate_chars(&request.content_type, MAX_CONTENT_TYPE_CHARS),
            body_sample: String::new(),
            classification: None,
            credential_digest: String::new(),
            outcome,
            status: response_status(outcome, &request.method),
        }
    }
}
