//! Download Admit Card Use Case
//!
//! The locator comes back from the caller, so it is re-validated here and
//! never trusted because the query endpoint produced it.

use crate::application::config::AdmitConfig;
use crate::domain::repository::AdmitCardStore;
use crate::domain::services::authorize_path;
use crate::error::{AdmitError, AdmitResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output DTO for download admit card
#[derive(Debug, Clone)]
pub struct DownloadAdmitCardOutput {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Download Admit Card Use Case
pub struct DownloadAdmitCardUseCase<S>
where
    S: AdmitCardStore,
{
    store: Arc<S>,
    config: Arc<AdmitConfig>,
}

impl<S> DownloadAdmitCardUseCase<S>
where
    S: AdmitCardStore,
{
    pub fn new(store: Arc<S>, config: Arc<AdmitConfig>) -> Self {
        Self { store, config }
    }

    /// Validate a caller-supplied locator against the storage root
    pub fn authorize(&self, requested: &str) -> AdmitResult<PathBuf> {
        if requested.is_empty() {
            return Err(AdmitError::MissingPath);
        }

        authorize_path(&self.config.storage_root, Path::new(requested)).ok_or_else(|| {
            tracing::warn!(requested = %requested, "Download path rejected");
            AdmitError::Forbidden
        })
    }

    pub async fn execute(&self, requested: &str) -> AdmitResult<DownloadAdmitCardOutput> {
        let path = self.authorize(requested)?;
        let bytes = self.store.read(&path).await?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Serving admit card");

        Ok(DownloadAdmitCardOutput { path, bytes })
    }
}
