//! Admit Card Lookup Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Name normalization, storage keys, path authorization, store trait
//! - `application/` - Use cases
//! - `infra/` - Filesystem store implementation
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Every query is rate limited per client before any lookup work
//! - Query fields cannot contain path separators or control characters
//! - Download locators are re-validated against the storage root on every
//!   request; the check is lexical and never reveals whether a path exists
//! - The store is read-only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AdmitConfig;
pub use error::{AdmitError, AdmitResult};
pub use infra::fs::FsAdmitCardStore;
pub use presentation::router::{admit_router, admit_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
