//! Observability infrastructure
//!
//! Structured logging through `tracing`. Library code only emits events;
//! installing a subscriber is left to the host process via
//! [`init_tracing`].

pub mod logging;

pub use logging::{init_tracing, LogFormat};
