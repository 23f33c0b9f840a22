//! Credential handling for stored records.
//!
//! Submitted credentials are reduced to a one-way digest; their plaintext
//! values are replaced before any sample of the request is stored.

use sha2::{Digest, Sha256};

/// Replacement for credential values in stored samples.
pub const REDACTED: &str = "[REDACTED]";

/// Keys whose values are never stored in plaintext (compared lowercase).
const CREDENTIAL_KEYS: &[&str] = &[
    "username", "user", "login", "password", "passwd", "pass", "pwd",
];

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

fn is_credential_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    CREDENTIAL_KEYS.contains(&key.as_str())
}

/// Username/password pair submitted through a login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Parse `username` / `password` from a form body, urlencoded or
    /// `multipart/form-data`.
    ///
    /// Returns `None` unless the body is a form and at least one field is
    /// present. The first occurrence of each field wins.
    pub fn from_body(content_type: &str, body: &str) -> Option<Self> {
        let fields: Vec<(String, String)> = match form_kind(content_type)? {
            FormKind::UrlEncoded => url::form_urlencoded::parse(body.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            FormKind::Multipart(boundary) => multipart_parts(body, &boundary)
                .into_iter()
                .filter_map(|part| Some((part.name()?, part.value.to_string())))
                .collect(),
        };

        let mut creds = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "username" if creds.username.is_none() => creds.username = Some(value),
                "password" if creds.password.is_none() => creds.password = Some(value),
                _ => {}
            }
        }

        if creds.username.is_none() && creds.password.is_none() {
            None
        } else {
            Some(creds)
        }
    }

    /// Hex SHA-256 of `username:password`; a missing field counts as empty.
    pub fn digest(&self) -> String {
        credential_digest(
            self.username.as_deref().unwrap_or(""),
            self.password.as_deref().unwrap_or(""),
        )
    }
}

enum FormKind {
    UrlEncoded,
    Multipart(String),
}

fn form_kind(content_type: &str) -> Option<FormKind> {
    let lower = content_type.trim().to_ascii_lowercase();
    if lower.starts_with(FORM_CONTENT_TYPE) {
        Some(FormKind::UrlEncoded)
    } else if lower.starts_with(MULTIPART_CONTENT_TYPE) {
        multipart_boundary(content_type).map(FormKind::Multipart)
    } else {
        None
    }
}

/// `boundary` parameter of a multipart content type, unquoted.
fn multipart_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("boundary") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// One multipart section, split into its header block, value and the line
/// break before the next delimiter.
struct Part<'a> {
    head: &'a str,
    value: &'a str,
    tail: &'a str,
}

impl<'a> Part<'a> {
    fn parse(section: &'a str) -> Option<Self> {
        let (split, sep_len) = match (section.find("\r\n\r\n"), section.find("\n\n")) {
            (Some(crlf), Some(lf)) if lf < crlf => (lf, 2),
            (Some(crlf), _) => (crlf, 4),
            (None, Some(lf)) => (lf, 2),
            (None, None) => return None,
        };
        let (head, rest) = section.split_at(split + sep_len);
        let value = rest
            .strip_suffix("\r\n")
            .or_else(|| rest.strip_suffix('\n'))
            .unwrap_or(rest);
        Some(Self {
            head,
            value,
            tail: &rest[value.len()..],
        })
    }

    /// The `name` parameter of the `Content-Disposition` header.
    fn name(&self) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (header, value) = line.split_once(':')?;
            if !header.trim().eq_ignore_ascii_case("content-disposition") {
                return None;
            }
            value.split(';').skip(1).find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("name")
                    .then(|| value.trim().trim_matches('"').to_string())
            })
        })
    }
}

fn multipart_parts<'a>(body: &'a str, boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    body.split(delimiter.as_str())
        .skip(1)
        .filter_map(Part::parse)
        .collect()
}

/// Replace credential part values, leaving the rest of the body intact.
fn redact_multipart(body: &str, boundary: &str) -> String {
    let delimiter = format!("--{}", boundary);
    body.split(delimiter.as_str())
        .enumerate()
        .map(|(i, section)| match Part::parse(section) {
            Some(part) if i > 0 && part.name().is_some_and(|n| is_credential_key(&n)) => {
                format!("{}{}{}", part.head, REDACTED, part.tail)
            }
            _ => section.to_string(),
        })
        .collect::<Vec<_>>()
        .join(delimiter.as_str())
}

/// Hex SHA-256 of `username:password`.
pub fn credential_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Replace credential values in `key=value&...` text, leaving every other
/// segment byte-for-byte intact.
pub fn redact_pairs(input: &str) -> String {
    if !input.contains('=') {
        return input.to_string();
    }

    input
        .split('&')
        .map(|segment| match segment.split_once('=') {
            Some((raw_key, _)) => {
                let key = url::form_urlencoded::parse(raw_key.as_bytes())
                    .next()
                    .map(|(k, _)| k.into_owned())
                    .unwrap_or_else(|| raw_key.to_string());
                if is_credential_key(&key) {
                    format!("{}={}", raw_key, REDACTED)
                } else {
                    segment.to_string()
                }
            }
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn redact_json_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if is_credential_key(key) && !child.is_null() {
                    *child = serde_json::Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(child);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

/// Redact credential values from a request body.
///
/// Multipart bodies have credential parts replaced, JSON documents are
/// rewritten with credential members replaced, and anything else is treated
/// as `key=value` pairs.
pub fn redact_body(content_type: &str, body: &str) -> String {
    if let Some(FormKind::Multipart(boundary)) = form_kind(content_type) {
        return redact_multipart(body, &boundary);
    }
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(mut value) = serde_json::from_str::<serde_json::Value>(body) {
            redact_json_value(&mut value);
            if let Ok(redacted) = serde_json::to_string(&value) {
                return redacted;
            }
        }
    }
    redact_pairs(body)
}
