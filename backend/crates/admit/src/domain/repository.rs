//! Repository Traits
//!
//! Interface to the admit card store. Implementation is in infrastructure layer.
//! The store is read-only from the service's point of view.

use crate::error::AdmitResult;
use std::path::Path;

/// Admit card store trait
#[trait_variant::make(AdmitCardStore: Send)]
pub trait LocalAdmitCardStore {
    /// Whether a regular file exists at `path`.
    /// Lookup failures count as absent.
    async fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path`
    async fn read(&self, path: &Path) -> AdmitResult<Vec<u8>>;
}
