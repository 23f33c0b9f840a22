//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// `LOG_JSON=1` or `LOG_JSON=true` switches to JSON lines.
fn json_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber from `RUST_LOG` and `LOG_JSON`.
///
/// Captured events go to the event store, never to these logs; log lines
/// carry identities and labels only.
pub fn init_tracing_from_env() {
    let directives = std::env::var("RUST_LOG").ok();
    let json = json_requested(std::env::var("LOG_JSON").ok().as_deref());
    let filter = env_filter(directives.as_deref());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_file(true).with_line_number(true))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }

    tracing::debug!(json, "Tracing initialized");
}
