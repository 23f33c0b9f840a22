//! Event type definitions for the capture pipeline.
//!
//! One [`Event`] is written per observed interaction. Field names are the
//! on-disk keys; the aliases accept records written by earlier releases
//! (`ts`, `ip`, `query`, `cred_hash`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// HTTP method of a captured request.
///
/// GET and POST are the only methods the decoys answer differently;
/// everything else keeps its verb text for the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(verb) => verb,
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl From<&str> for HttpMethod {
    fn from(verb: &str) -> Self {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for HttpMethod {
    fn from(verb: String) -> Self {
        Self::from(verb.as_str())
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probable intent of a captured request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    PathTraversal,
    Sqli,
    Xss,
    CommonScan,
    CredentialAttempt,
    Unknown,
}

impl Classification {
    /// Get the label string as written to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathTraversal => "path_traversal",
            Self::Sqli => "sqli",
            Self::Xss => "xss",
            Self::CommonScan => "common_scan",
            Self::CredentialAttempt => "credential_attempt",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Served,
    Throttled,
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Served => "SERVED",
            Self::Throttled => "THROTTLED",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured interaction. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "ip")]
    pub client_identity: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, alias = "query")]
    pub query_string: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referrer: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub body_sample: String,
    /// Absent only for throttled requests, which skip classification.
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default, alias = "cred_hash")]
    pub credential_digest: String,
    pub outcome: Outcome,
    /// HTTP status the decoy answered with.
    pub status: u16,
}

impl Event {
    /// Serialize to a single store line, without the trailing newline.
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn has_credentials(&self) -> bool {
        !self.credential_digest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        Event {
            event_id: Uuid::nil(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            client_identity: "203.0.113.7".into(),
            method: HttpMethod::Post,
            path: "/login".into(),
            query_string: String::new(),
            user_agent: "curl/8.0".into(),
            referrer: String::new(),
            content_type: "application/x-www-form-urlencoded".into(),
            body_sample: "username=[REDACTED]&password=[REDACTED]".into(),
            classification: Some(Classification::CredentialAttempt),
            credential_digest: "abc".into(),
            outcome: Outcome::Served,
            status: 401,
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(HttpMethod::from("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::from("POST"), HttpMethod::Post);
        assert_eq!(HttpMethod::from("propfind"), HttpMethod::Other("PROPFIND".into()));
        assert_eq!(HttpMethod::Other("PUT".into()).as_str(), "PUT");
    }

    #[test]
    fn test_labels_serialize_as_snake_case() {
        let json = serde_json::to_string(&Classification::PathTraversal).unwrap();
        assert_eq!(json, "\"path_traversal\"");
        let json = serde_json::to_string(&Outcome::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn test_event_line_is_single_line() {
        let mut event = sample_event();
        event.body_sample = "line one\nline two".into();
        let line = event.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        let parsed: Event = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_reads_legacy_keys() {
        let line = r#"{"event_id":"00000000-0000-0000-0000-000000000000","ts":"2024-03-01T12:30:00+00:00","ip":"10.0.0.1","method":"GET","path":"/admin","query":"a=1","cred_hash":"","outcome":"SERVED","status":200,"classification":"common_scan"}"#;
        let event: Event = serde_json::from_str(line).unwrap();
        assert_eq!(event.client_identity, "10.0.0.1");
        assert_eq!(event.query_string, "a=1");
        assert_eq!(event.classification, Some(Classification::CommonScan));
        assert!(!event.has_credentials());
    }

    #[test]
    fn test_throttled_event_has_null_classification() {
        let mut event = sample_event();
        event.classification = None;
        event.outcome = Outcome::Throttled;
        let value: serde_json::Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert!(value["classification"].is_null());
        assert_eq!(value["outcome"], "THROTTLED");
    }
}
