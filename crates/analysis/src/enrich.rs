//! User-agent enrichment.
//!
//! Buckets raw user-agent strings into coarse client categories so the
//! report can show who is probing: browsers, crawlers, or scripted tools.

use woothee::parser::Parser;

/// Prefixes of HTTP libraries and scanners that browsers never send.
const TOOL_PREFIXES: &[&str] = &[
    "curl",
    "wget",
    "python-requests",
    "python-urllib",
    "python-httpx",
    "aiohttp",
    "go-http-client",
    "java/",
    "okhttp",
    "libwww-perl",
    "sqlmap",
    "nikto",
    "nmap",
    "masscan",
    "zgrab",
    "nuclei",
    "gobuster",
    "dirbuster",
    "wpscan",
    "hydra",
];

/// Maps user agents to categories.
///
/// Uses woothee for browser and crawler detection; scripted clients are
/// matched by prefix first since woothee reports most of them as unknown.
pub struct AgentClassifier {
    parser: Parser,
}

impl AgentClassifier {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Category for one user agent: `none`, `tool`, `bot`, `desktop`,
    /// `mobile`, `other`, or `unknown`.
    pub fn categorize(&self, user_agent: &str) -> &'static str {
        let user_agent = user_agent.trim();
        if user_agent.is_empty() {
            return "none";
        }

        let lower = user_agent.to_ascii_lowercase();
        if TOOL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
            return "tool";
        }

        match self.parser.parse(user_agent) {
            // woothee categories: pc, smartphone, mobilephone, crawler, appliance, misc
            Some(result) => match result.category {
                "pc" => "desktop",
                "smartphone" | "mobilephone" => "mobile",
                "crawler" => "bot",
                "appliance" | "misc" => "other",
                _ => "unknown",
            },
            None => "unknown",
        }
    }
}

impl Default for AgentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
