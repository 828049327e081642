//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain value objects (CandidateName, CandidateId)
//! - Domain entities (StorageKey, ResolvedRecord, LookupOutcome)
//! - Domain services (name normalization, storage path authorization)
//! - Repository traits (storage collaborator interface)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
