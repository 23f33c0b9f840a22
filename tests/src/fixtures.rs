//! Request fixtures.

use chrono::{DateTime, TimeZone, Utc};

/// Fixed start instant, 10 seconds into a minute.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 14, 3, 20, 10).unwrap()
}

/// Documentation-range address, distinct per `n`.
pub fn client_ip(n: u8) -> String {
    format!("203.0.113.{}", n)
}

/// Login form fields.
pub fn login_form(username: &str, password: &str) -> Vec<(&'static str, String)> {
    vec![
        ("username", username.to_string()),
        ("password", password.to_string()),
    ]
}

pub const SCANNER_UA: &str = "Mozilla/5.0 zgrab/0.x";
pub const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
