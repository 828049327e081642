//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use admit::{AdmitConfig, FsAdmitCardStore, admit_router};
use anyhow::Context;
use axum::Router;
use chrono::Utc;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Read an environment variable, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {value:?}")),
        Err(_) => Ok(default),
    }
}

fn admit_config_from_env() -> anyhow::Result<AdmitConfig> {
    let defaults = AdmitConfig::default();
    let config = AdmitConfig {
        storage_root: env_or("ADMIT_STORAGE_ROOT", defaults.storage_root)?,
        artifact_extension: env_or("ADMIT_ARTIFACT_EXTENSION", defaults.artifact_extension)?,
        trust_proxy_headers: env_or("ADMIT_TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
    };
    config.validate()?;
    Ok(config)
}

fn rate_limit_config_from_env() -> anyhow::Result<RateLimitConfig> {
    let defaults = RateLimitConfig::default();
    let max_clients = env_or("RATE_LIMIT_MAX_CLIENTS", defaults.max_tracked_clients)?;
    Ok(defaults.with_max_tracked_clients(max_clients))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "admit_api=info,admit=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let admit_config = admit_config_from_env()?;
    let rate_limit_config = rate_limit_config_from_env()?;
    let sweep_interval = Duration::from_secs(env_or("RATE_LIMIT_SWEEP_SECS", 600u64)?.max(1));

    // A missing root only means every lookup answers "not found"
    let store = FsAdmitCardStore::new(admit_config.storage_root.clone());
    if !store.root_exists().await {
        tracing::warn!(
            storage_root = %admit_config.storage_root.display(),
            "Admit card storage root does not exist, continuing anyway"
        );
    }

    tracing::info!(
        storage_root = %admit_config.storage_root.display(),
        extension = %admit_config.artifact_extension,
        trust_proxy_headers = admit_config.trust_proxy_headers,
        max_tracked_clients = rate_limit_config.max_tracked_clients,
        "Admit card service configured"
    );

    let rate_limiter = Arc::new(InMemoryRateLimitStore::new(rate_limit_config));

    // Periodic cleanup: drop clients with no activity inside the longest window
    let sweeper = Arc::clone(&rate_limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            sweeper.evict_idle(Utc::now());
        }
    });

    // Build router
    let app = Router::new()
        .merge(admit_router(admit_config, rate_limiter))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = env_or("ADMIT_BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
