//! Snare deception endpoint
//!
//! Serves decoy admin and login surfaces, records every interaction as a
//! redacted JSON-lines event, classifies probable intent, and throttles
//! noisy sources. Health and metrics live on a separate internal listener.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{internal_router, router, AppState, DecoyTable, RateLimitConfig, DEFAULT_DECOY_PATHS};
use event_sink::{health::check_writable, JsonlSink, SinkConfig};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Internal listener for health probes and metrics
    #[serde(default = "default_admin_host")]
    admin_host: String,
    #[serde(default = "default_admin_port")]
    admin_port: u16,

    /// Take the client identity from `X-Forwarded-For` (set behind a proxy)
    #[serde(default = "default_trust_forwarded_for")]
    trust_forwarded_for: bool,

    /// Paths answered with a decoy page
    #[serde(default = "default_decoy_paths")]
    decoy_paths: Vec<String>,

    #[serde(default)]
    rate_limit: RateLimitConfig,

    #[serde(default)]
    sink: SinkConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_admin_host() -> String {
    "127.0.0.1".to_string()
}

fn default_admin_port() -> u16 {
    9090
}

fn default_trust_forwarded_for() -> bool {
    true
}

fn default_decoy_paths() -> Vec<String> {
    DEFAULT_DECOY_PATHS.iter().map(|p| p.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_host: default_admin_host(),
            admin_port: default_admin_port(),
            trust_forwarded_for: default_trust_forwarded_for(),
            decoy_paths: default_decoy_paths(),
            rate_limit: RateLimitConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting snare v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        sink = %config.sink.path.display(),
        limit = config.rate_limit.max_requests_per_minute,
        trust_forwarded_for = config.trust_forwarded_for,
        decoys = config.decoy_paths.len(),
        "Loaded configuration"
    );

    check_health(&config.sink).await;

    let sink = Arc::new(
        JsonlSink::open(&config.sink)
            .await
            .context("Failed to open event log")?,
    );

    let state = AppState::with_rate_limit(sink, config.rate_limit.clone())
        .with_decoys(DecoyTable::from_paths(&config.decoy_paths))
        .with_trust_forwarded_for(config.trust_forwarded_for);

    let rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 30 seconds)");

    // Internal listener: health and metrics, never exposed with the decoys
    let admin_addr: SocketAddr = format!("{}:{}", config.admin_host, config.admin_port)
        .parse()
        .context("Invalid admin address")?;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr)
        .await
        .context("Failed to bind admin address")?;
    info!("Internal endpoints on http://{}", admin_addr);

    let admin_app = internal_router(state.clone());
    let admin_server = tokio::spawn(async move {
        if let Err(e) = axum::serve(admin_listener, admin_app).await {
            error!("Internal server error: {}", e);
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    // Connect info carries the peer address used as the fallback identity
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutting down...");
    rate_limiter_cleanup.abort();
    admin_server.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables, e.g. SNARE__RATE_LIMIT__MAX_REQUESTS_PER_MINUTE
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SNARE")
                .prefix_separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Decoy paths are registered as literal routes
    if let Some(bad) = config
        .decoy_paths
        .iter()
        .find(|p| !p.starts_with('/') || p.contains([':', '*', '{', '}']))
    {
        anyhow::bail!("Invalid decoy path {:?}: must be a literal path starting with '/'", bad);
    }

    Ok(config)
}

/// Check the event log on startup.
async fn check_health(sink: &SinkConfig) {
    if check_writable(sink).await {
        health().event_sink.set_healthy();
        info!("Event log: writable");
    } else {
        health().event_sink.set_unhealthy("Event log not writable");
        warn!("Event log: not writable");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
