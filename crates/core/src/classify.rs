//! Request classification.
//!
//! The rule set is an ordered list of `(label, predicate)` pairs evaluated
//! against one lowercase corpus built from path, query string, and body.
//! The first matching rule wins, so path-based attacks are reported before
//! generic scan signatures, and those before credential submissions.

use crate::events::{Classification, HttpMethod};

/// Test applied to the lowercase corpus.
#[derive(Debug, Clone)]
pub enum RulePredicate {
    /// Corpus contains any of the needles.
    ContainsAny(&'static [&'static str]),
    /// Method is POST and the corpus contains any of the needles.
    PostContainsAny(&'static [&'static str]),
}

impl RulePredicate {
    fn matches(&self, method: &HttpMethod, corpus: &str) -> bool {
        match self {
            Self::ContainsAny(needles) => needles.iter().any(|n| corpus.contains(n)),
            Self::PostContainsAny(needles) => {
                method.is_post() && needles.iter().any(|n| corpus.contains(n))
            }
        }
    }
}

/// One entry of the ordered rule set.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub label: Classification,
    pub predicate: RulePredicate,
}

impl ClassificationRule {
    pub const fn new(label: Classification, predicate: RulePredicate) -> Self {
        Self { label, predicate }
    }

    /// Test this rule alone against a request.
    pub fn matches(&self, method: &HttpMethod, path: &str, query: &str, body: &str) -> bool {
        self.predicate.matches(method, &corpus(path, query, body))
    }
}

const TRAVERSAL: &[&str] = &["../", "..%2f", "%2e%2e%2f"];
const SQLI: &[&str] = &[
    " union select",
    " or 1=1",
    "' or '1'='1",
    "sleep(",
    "benchmark(",
];
const XSS: &[&str] = &["<script", "%3cscript", "onerror=", "onload="];
const SCAN: &[&str] = &[
    "wp-login.php",
    "xmlrpc.php",
    "phpmyadmin",
    "administrator",
    "/admin",
];
const CREDENTIAL: &[&str] = &["password", "passwd"];

/// Default rule set in priority order.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(
            Classification::PathTraversal,
            RulePredicate::ContainsAny(TRAVERSAL),
        ),
        ClassificationRule::new(Classification::Sqli, RulePredicate::ContainsAny(SQLI)),
        ClassificationRule::new(Classification::Xss, RulePredicate::ContainsAny(XSS)),
        ClassificationRule::new(Classification::CommonScan, RulePredicate::ContainsAny(SCAN)),
        ClassificationRule::new(
            Classification::CredentialAttempt,
            RulePredicate::PostContainsAny(CREDENTIAL),
        ),
    ]
}

/// Build the search corpus. The separators keep tokens such as
/// `" or 1=1"` matchable at the start of a query or body.
fn corpus(path: &str, query: &str, body: &str) -> String {
    let mut corpus = String::with_capacity(path.len() + query.len() + body.len() + 2);
    corpus.push_str(path);
    corpus.push(' ');
    corpus.push_str(query);
    corpus.push(' ');
    corpus.push_str(body);
    corpus.to_lowercase()
}

/// Ordered classifier, compiled once at startup and shared across requests.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classify a request. Falls through to `Unknown` when nothing matches.
    pub fn classify(
        &self,
        method: &HttpMethod,
        path: &str,
        query: &str,
        body: &str,
    ) -> Classification {
        let corpus = corpus(path, query, body);
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(method, &corpus))
            .map(|rule| rule.label)
            .unwrap_or(Classification::Unknown)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
