//! HTTP transport pipeline
//!
//! [`Transport`] is the seam between request construction and the wire.
//! [`ReqwestTransport`] performs the actual blocking exchange and
//! [`AuthenticatingTransport`] is the pipeline stage that stamps every
//! outgoing request with the next pooled credential.

use std::time::Duration;

use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use rulegate_domain::constants::{AUTHORIZATION_SCHEME, DEFAULT_REQUEST_TIMEOUT_SECS};
use rulegate_domain::{Result, RulegateError, TransportError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::rotator::CredentialRotator;
use crate::errors::{request_error, InfraError};

/// A fully buffered outbound request.
///
/// Buffered so that pipeline stages can clone it cheaply and leave the
/// caller's original untouched.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: HeaderMap::new(), body: None }
    }

    /// Attach a JSON body and the matching content type.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }
}

/// A fully buffered response, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Result of a single HTTP exchange.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Performs one HTTP exchange.
///
/// Non-2xx responses are returned as `Ok`; only failures to obtain a
/// response are errors. Implementations do not retry.
pub trait Transport: Send + Sync {
    fn round_trip(&self, request: &HttpRequest) -> TransportResult<HttpResponse>;
}

/// Blocking transport backed by `reqwest`.
///
/// Deadlines are enforced by the underlying client; there is no retry.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }
}

impl Transport for ReqwestTransport {
    fn round_trip(&self, request: &HttpRequest) -> TransportResult<HttpResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, %url, "sending HTTP request");

        let mut builder =
            self.client.request(method.clone(), url.clone()).headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            request_error(&method, &url, &err)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        debug!(%method, %url, %status, "received HTTP response");

        let body = response.bytes().map_err(|err| request_error(&method, &url, &err))?;
        Ok(HttpResponse { status, headers, body: body.to_vec() })
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl ReqwestTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            RulegateError::from(infra)
        })?;

        Ok(ReqwestTransport { client })
    }
}

/// Pipeline stage that authenticates every request with the next credential
/// from a shared round-robin pool.
///
/// Each request is cloned before the `Authorization` header is overwritten,
/// so the caller's request is never modified. Failures from the inner
/// transport pass through untouched and never influence rotation.
#[derive(Debug)]
pub struct AuthenticatingTransport<T> {
    inner: T,
    credentials: CredentialRotator<HeaderValue>,
}

impl<T: Transport> AuthenticatingTransport<T> {
    /// Wrap `inner` with a rotator over `credentials`.
    ///
    /// # Errors
    /// Returns [`RulegateError::Config`] when the pool is empty or a
    /// credential cannot be sent as a header value.
    pub fn new(inner: T, credentials: &[String]) -> Result<Self> {
        let headers = credentials
            .iter()
            .enumerate()
            .map(|(slot, credential)| {
                let header = format!("{AUTHORIZATION_SCHEME} {credential}");
                let mut value = HeaderValue::from_str(&header).map_err(|_| {
                    RulegateError::Config(format!(
                        "credential {slot} contains characters not allowed in an HTTP header"
                    ))
                })?;
                value.set_sensitive(true);
                Ok(value)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { inner, credentials: CredentialRotator::new(headers)? })
    }

    pub fn pool_size(&self) -> usize {
        self.credentials.len()
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for AuthenticatingTransport<T> {
    fn round_trip(&self, request: &HttpRequest) -> TransportResult<HttpResponse> {
        let step = self.credentials.advance();
        debug!(slot = step.position, url = %request.url, "authenticating request");

        let mut outgoing = request.clone();
        outgoing.headers.insert(AUTHORIZATION, step.credential.clone());
        self.inner.round_trip(&outgoing)
    }
}
