//! Infrastructure error conversions
//!
//! Maps errors from third-party crates into the domain error types.

mod conversions;

pub use conversions::InfraError;
pub(crate) use conversions::request_error;
