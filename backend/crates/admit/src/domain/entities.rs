//! Domain Entities
//!
//! Results of resolving a query against the admit card store.

use crate::domain::value_objects::CandidateId;
use std::fmt;
use std::path::PathBuf;

/// Storage key: `<id>-<normalized name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(id: &CandidateId, normalized_name: &str) -> Self {
        Self(format!("{}-{}", id.as_str(), normalized_name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the stored artifact, e.g. `20230001-张三.pdf`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A located admit card; `path` is always under the storage root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub key: StorageKey,
    pub path: PathBuf,
}

/// Outcome of a lookup. `NotFound` is a regular answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(ResolvedRecord),
    NotFound { key: StorageKey },
}
