//! Filesystem Store Implementation

use crate::domain::repository::AdmitCardStore;
use crate::error::{AdmitError, AdmitResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Admit cards stored as files under a single root directory
#[derive(Debug, Clone)]
pub struct FsAdmitCardStore {
    root: PathBuf,
}

impl FsAdmitCardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the root directory is present; lookups just miss otherwise
    pub async fn root_exists(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .is_ok_and(|m| m.is_dir())
    }
}

impl AdmitCardStore for FsAdmitCardStore {
    async fn exists(&self, path: &Path) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Admit card lookup failed");
                false
            }
        }
    }

    async fn read(&self, path: &Path) -> AdmitResult<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AdmitError::FileNotFound),
            // Authorized paths that name a directory
            Err(e) if e.kind() == ErrorKind::IsADirectory => Err(AdmitError::FileNotFound),
            Err(e) => Err(AdmitError::Storage(e)),
        }
    }
}
