//! Admit Card Router

use crate::application::config::AdmitConfig;
use crate::domain::repository::AdmitCardStore;
use crate::infra::fs::FsAdmitCardStore;
use crate::presentation::handlers::{self, AdmitAppState};
use axum::{
    Router,
    routing::{get, post},
};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore};
use std::sync::Arc;

pub const QUERY_ROUTE: &str = "/query";
pub const DOWNLOAD_ROUTE: &str = "/download";

/// Create the admit card router over the filesystem store
pub fn admit_router(
    config: AdmitConfig,
    rate_limiter: Arc<InMemoryRateLimitStore>,
) -> Router {
    let store = FsAdmitCardStore::new(config.storage_root.clone());
    admit_router_generic(store, rate_limiter, config)
}

/// Create a generic admit card router for any store and rate limiter
pub fn admit_router_generic<S, R>(store: S, rate_limiter: Arc<R>, config: AdmitConfig) -> Router
where
    S: AdmitCardStore + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
{
    let state = AdmitAppState {
        store: Arc::new(store),
        rate_limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route(QUERY_ROUTE, post(handlers::query_admit_card::<S, R>))
        .route(DOWNLOAD_ROUTE, get(handlers::download_admit_card::<S, R>))
        .with_state(state)
}
