//! HTTP Handlers

use crate::application::config::AdmitConfig;
use crate::application::download_admit_card::DownloadAdmitCardUseCase;
use crate::application::query_admit_card::{QueryAdmitCardInput, QueryAdmitCardUseCase};
use crate::domain::entities::LookupOutcome;
use crate::domain::repository::AdmitCardStore;
use crate::domain::value_objects::{CandidateId, CandidateName, InputError};
use crate::error::{AdmitError, AdmitResult};
use crate::presentation::dto::{DownloadParams, QueryRequest, QueryResponse};
use crate::presentation::router::DOWNLOAD_ROUTE;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use chrono::Utc;
use platform::client::{ClientKey, extract_client_ip};
use platform::rate_limit::RateLimitStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Shared state for admit card handlers
pub struct AdmitAppState<S, R> {
    pub store: Arc<S>,
    pub rate_limiter: Arc<R>,
    pub config: Arc<AdmitConfig>,
}

impl<S, R> Clone for AdmitAppState<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rate_limiter: Arc::clone(&self.rate_limiter),
            config: Arc::clone(&self.config),
        }
    }
}

/// POST /query
pub async fn query_admit_card<S, R>(
    State(state): State<AdmitAppState<S, R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AdmitResult<Json<QueryResponse>>
where
    S: AdmitCardStore + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
{
    // Input errors never consume a rate-limit slot
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed query body");
        AdmitError::InvalidInput(InputError::Malformed)
    })?;
    let name = CandidateName::new(&req.name)?;
    let id = CandidateId::new(&req.id)?;

    let client_ip = extract_client_ip(
        &headers,
        Some(addr.ip()),
        state.config.trust_proxy_headers,
    );

    let use_case = QueryAdmitCardUseCase::new(
        state.store.clone(),
        state.rate_limiter.clone(),
        state.config.clone(),
    );

    let input = QueryAdmitCardInput {
        client: ClientKey::from_ip(client_ip),
        id,
        name: name.clone(),
    };

    let response = match use_case.execute(input, Utc::now()).await? {
        LookupOutcome::Found(record) => QueryResponse {
            message: format!("查询到{name}的准考证，已自动开始下载。"),
            file_url: Some(download_url(&record.path)?),
        },
        LookupOutcome::NotFound { .. } => QueryResponse {
            message: format!("未找到{name}的准考证，请检查信息是否匹配。"),
            file_url: None,
        },
    };

    Ok(Json(response))
}

/// GET /download?path=...
pub async fn download_admit_card<S, R>(
    State(state): State<AdmitAppState<S, R>>,
    params: Result<Query<DownloadParams>, QueryRejection>,
) -> AdmitResult<impl IntoResponse>
where
    S: AdmitCardStore + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
{
    let requested = params
        .ok()
        .and_then(|Query(params)| params.path)
        .unwrap_or_default();

    let use_case = DownloadAdmitCardUseCase::new(state.store.clone(), state.config.clone());
    let output = use_case.execute(&requested).await?;

    Ok((
        [(header::CONTENT_TYPE, state.config.content_type())],
        output.bytes,
    ))
}

/// Locator handed to the client: `/download?path=<url-encoded path>`
pub fn download_url(path: &Path) -> AdmitResult<String> {
    let locator = path.to_string_lossy();
    let query = serde_urlencoded::to_string([("path", locator.as_ref())])
        .map_err(|e| AdmitError::Internal(format!("cannot encode download locator: {e}")))?;
    Ok(format!("{DOWNLOAD_ROUTE}?{query}"))
}
