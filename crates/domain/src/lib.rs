//! # Rulegate Domain
//!
//! Domain types for ruleset reconciliation.
//!
//! This crate contains:
//! - Ruleset, rule, and logging models
//! - Validation outcomes reported by the remote expression validator
//! - Provider configuration structures
//! - Error types and the crate-wide `Result` alias
//!
//! ## Architecture
//! - No dependencies on other Rulegate crates
//! - No I/O; pure data and error definitions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
