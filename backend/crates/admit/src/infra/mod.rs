//! Infrastructure Layer
//!
//! Storage implementations.

pub mod fs;
