//! # Rulegate Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The credential-rotating HTTP transport pipeline
//! - The remote expression validator
//! - The HTTP ruleset reconciler
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `rulegate-core`
//! - Depends on `rulegate-domain` and `rulegate-core`
//! - Contains all "impure" code (network and file I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod provider;
pub mod rulesets;
pub mod validator;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{ApiClient, AuthenticatingTransport, CredentialRotator, ReqwestTransport, Transport};
pub use observability::{init_tracing, LogFormat};
pub use provider::{configure, Client};
pub use rulesets::RulesetReconciler;
pub use validator::{validate_expression, RemoteExpressionValidator};
