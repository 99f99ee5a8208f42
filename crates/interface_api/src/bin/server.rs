//! CRM Facade - API Server Binary
//!
//! This binary starts the HTTP API server in front of the HubSpot CRM.
//!
//! # Usage
//!
//! ```bash
//! # Run with a token from the environment
//! CRM_HUBSPOT_ACCESS_TOKEN=pat-... cargo run --bin crm-api
//!
//! # Override host, port, and upstream timeout
//! CRM_HOST=127.0.0.1 CRM_PORT=9000 CRM_HUBSPOT_TIMEOUT_SECS=5 cargo run --bin crm-api
//! ```
//!
//! # Environment Variables
//!
//! * `CRM_HOST` - Server host (default: 0.0.0.0)
//! * `CRM_PORT` - Server port (default: 8000)
//! * `CRM_APP_NAME` - Service name shown by `GET /` (default: CRM Integration API)
//! * `CRM_HUBSPOT_ACCESS_TOKEN` - HubSpot private-app token (required; `HUBSPOT_ACCESS_TOKEN` also accepted)
//! * `CRM_HUBSPOT_TIMEOUT_SECS` - Per-request upstream timeout (default: 10; `HUBSPOT_TIMEOUT` also accepted)
//! * `CRM_HUBSPOT_BASE_URL` - HubSpot API base URL (default: https://api.hubapi.com)
//! * `CRM_HUBSPOT_APP_URL` - HubSpot web app URL for contact links (default: https://app.hubspot.com)
//! * `CRM_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use anyhow::Context;
use domain_contact::{CrmService, HubSpotAdapter};
use interface_api::{create_router, config::ApiConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, builds the upstream adapter,
/// and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or the access token is missing
/// - The HTTP client for the upstream cannot be built
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        upstream = %config.hubspot_base_url,
        timeout_secs = config.hubspot_timeout_secs,
        "Starting CRM API server"
    );

    let adapter = HubSpotAdapter::new(config.hubspot_config())
        .context("failed to create HubSpot adapter")?;
    let crm = CrmService::new(Arc::new(adapter));

    let app = create_router(crm, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// `CRM_`-prefixed variables take precedence; the bare `HUBSPOT_ACCESS_TOKEN`
/// and `HUBSPOT_TIMEOUT` variables fill in when the prefixed ones are unset.
///
/// # Errors
///
/// Returns error if variables are malformed, no access token is configured,
/// or the upstream timeout is zero
fn load_config() -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("failed to read configuration")?;

    if config.hubspot_access_token.is_empty() {
        config.hubspot_access_token = std::env::var("HUBSPOT_ACCESS_TOKEN").unwrap_or_default();
    }
    if std::env::var("CRM_HUBSPOT_TIMEOUT_SECS").is_err() {
        if let Some(timeout) = std::env::var("HUBSPOT_TIMEOUT").ok().and_then(|t| t.parse().ok()) {
            config.hubspot_timeout_secs = timeout;
        }
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests are allowed to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
