//! HTTP plumbing for the remote management API
//!
//! Requests flow through a small pipeline: [`ApiClient`] builds and decodes
//! JSON exchanges, [`AuthenticatingTransport`] stamps the next pooled
//! credential, and [`ReqwestTransport`] performs the blocking exchange.

pub mod client;
pub mod rotator;
pub mod transport;

pub use client::ApiClient;
pub use rotator::{CredentialRotator, Rotation};
pub use transport::{
    AuthenticatingTransport, HttpRequest, HttpResponse, ReqwestTransport, ReqwestTransportBuilder,
    Transport, TransportResult,
};
