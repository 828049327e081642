//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client identification from request headers
//! - In-memory rate limiting with nested minute / hour / day quotas

pub mod client;
pub mod rate_limit;
