//! Application Configuration
//!
//! Configuration for the admit card application layer.

use crate::error::{AdmitError, AdmitResult};
use crate::domain::services::lexical_normalize;
use std::path::PathBuf;

/// Admit card application configuration
#[derive(Debug, Clone)]
pub struct AdmitConfig {
    /// Directory holding the admit cards; the only trust boundary for downloads
    pub storage_root: PathBuf,
    /// Extension of stored admit cards, without the dot
    pub artifact_extension: String,
    /// Honour X-Forwarded-For / X-Real-IP when identifying clients.
    /// Only safe behind a proxy that overwrites them.
    pub trust_proxy_headers: bool,
}

impl Default for AdmitConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("AdmitCards"),
            artifact_extension: "pdf".to_string(),
            trust_proxy_headers: false,
        }
    }
}

impl AdmitConfig {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    /// Reject settings under which no path could be authorized safely
    pub fn validate(&self) -> AdmitResult<()> {
        if lexical_normalize(&self.storage_root).as_os_str().is_empty() {
            return Err(AdmitError::Internal(format!(
                "storage root {:?} does not name a directory",
                self.storage_root
            )));
        }

        let ext = &self.artifact_extension;
        if ext.is_empty() || ext.contains(['/', '\\', '.', '\0']) {
            return Err(AdmitError::Internal(format!(
                "invalid artifact extension {ext:?}"
            )));
        }

        Ok(())
    }

    /// Content type served for downloads
    pub fn content_type(&self) -> &'static str {
        if self.artifact_extension.eq_ignore_ascii_case("pdf") {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdmitConfig::default();
        assert_eq!(config.storage_root, PathBuf::from("AdmitCards"));
        assert_eq!(config.artifact_extension, "pdf");
        assert!(!config.trust_proxy_headers);
        assert_eq!(config.content_type(), "application/pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_root() {
        assert!(AdmitConfig::new("").validate().is_err());
        assert!(AdmitConfig::new("./").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let config = AdmitConfig {
            artifact_extension: "../pdf".to_string(),
            ..AdmitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_other_extension_is_octet_stream() {
        let config = AdmitConfig {
            artifact_extension: "png".to_string(),
            ..AdmitConfig::default()
        };
        assert_eq!(config.content_type(), "application/octet-stream");
    }
}
