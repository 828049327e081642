//! Query Admit Card Use Case

use crate::application::config::AdmitConfig;
use crate::domain::entities::{LookupOutcome, ResolvedRecord, StorageKey};
use crate::domain::repository::AdmitCardStore;
use crate::domain::services::authorize_path;
use crate::domain::value_objects::{CandidateId, CandidateName};
use crate::error::{AdmitError, AdmitResult};
use chrono::{DateTime, Utc};
use platform::client::ClientKey;
use platform::rate_limit::{RateLimitDecision, RateLimitStore};
use std::sync::Arc;

/// Input DTO for query admit card
#[derive(Debug, Clone)]
pub struct QueryAdmitCardInput {
    pub client: ClientKey,
    pub id: CandidateId,
    pub name: CandidateName,
}

/// Query Admit Card Use Case
pub struct QueryAdmitCardUseCase<S, R>
where
    S: AdmitCardStore,
    R: RateLimitStore,
{
    store: Arc<S>,
    rate_limiter: Arc<R>,
    config: Arc<AdmitConfig>,
}

impl<S, R> QueryAdmitCardUseCase<S, R>
where
    S: AdmitCardStore,
    R: RateLimitStore,
{
    pub fn new(store: Arc<S>, rate_limiter: Arc<R>, config: Arc<AdmitConfig>) -> Self {
        Self {
            store,
            rate_limiter,
            config,
        }
    }

    /// Rate-limit the client, then resolve the admit card
    pub async fn execute(
        &self,
        input: QueryAdmitCardInput,
        now: DateTime<Utc>,
    ) -> AdmitResult<LookupOutcome> {
        let decision = self.rate_limiter.check(input.client.as_str(), now).await;
        if let RateLimitDecision::Rejected { retry_after, .. } = decision {
            return Err(AdmitError::RateLimited { retry_after });
        }

        self.resolve(&input.id, &input.name).await
    }

    /// Map (id, name) to a stored admit card
    pub async fn resolve(
        &self,
        id: &CandidateId,
        name: &CandidateName,
    ) -> AdmitResult<LookupOutcome> {
        let key = StorageKey::new(id, name.normalized());
        let candidate = self
            .config
            .storage_root
            .join(key.file_name(&self.config.artifact_extension));

        let path = authorize_path(&self.config.storage_root, &candidate).ok_or_else(|| {
            AdmitError::Internal(format!("storage key {key} escapes the storage root"))
        })?;

        if !self.store.exists(&path).await {
            tracing::info!(storage_key = %key, "Admit card not found");
            return Ok(LookupOutcome::NotFound { key });
        }

        tracing::info!(storage_key = %key, path = %path.display(), "Admit card found");
        Ok(LookupOutcome::Found(ResolvedRecord { key, path }))
    }
}
