//! JSON client over the authenticated transport

use std::sync::Arc;

use reqwest::{Method, Url};
use rulegate_domain::{Result, RulegateError, TransportError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportResult};

/// JSON client for the remote management API.
///
/// Builds endpoint URLs from path segments under a fixed base URL and turns
/// non-2xx answers into [`TransportError::Status`]. Authentication is the
/// job of the transport it wraps.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

/// Error list of the remote API's standard response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub(crate) errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub(crate) message: String,
}

/// Bodies are accepted wrapped in the envelope or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { result: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { result } | Self::Bare(result) => result,
        }
    }
}

impl ApiClient {
    /// # Errors
    /// Returns [`RulegateError::Config`] when `base_url` is not an absolute
    /// URL that can carry path segments.
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| RulegateError::Config(format!("invalid base URL {base_url:?}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RulegateError::Config(format!("base URL {base_url} cannot carry paths")));
        }
        Ok(Self { transport, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send one request and require a 2xx answer.
    pub fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> TransportResult<HttpResponse> {
        let url = self.endpoint(segments);
        let mut request = HttpRequest::new(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body).map_err(|err| TransportError::Request {
                method: method.to_string(),
                url: url.to_string(),
                message: format!("could not encode request body: {err}"),
            })?;
        }

        let response = self.transport.round_trip(&request)?;
        if response.is_success() {
            return Ok(response);
        }

        let message = error_message(&response);
        debug!(%method, %url, status = %response.status, %message, "remote returned an error");
        Err(TransportError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: response.status.as_u16(),
            message,
        })
    }

    pub fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> TransportResult<T> {
        let response = self.send_json::<()>(Method::GET, segments, None)?;
        decode(&self.endpoint(segments), &response)
    }

    pub fn post<B, T>(&self, segments: &[&str], body: &B) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_json(Method::POST, segments, Some(body))?;
        decode(&self.endpoint(segments), &response)
    }

    /// DELETE, ignoring whatever body the remote sends back.
    pub fn delete(&self, segments: &[&str]) -> TransportResult<()> {
        self.send_json::<()>(Method::DELETE, segments, None).map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(url: &Url, response: &HttpResponse) -> TransportResult<T> {
    response
        .json::<Body<T>>()
        .map(Body::into_inner)
        .map_err(|err| TransportError::Decode { url: url.to_string(), message: err.to_string() })
}

/// First reported error message, else the raw body, else the status reason.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(envelope) = response.json::<ErrorEnvelope>() {
        if let Some(first) = envelope.errors.into_iter().find(|e| !e.message.is_empty()) {
            return first.message;
        }
    }
    let text = response.text();
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    response.status.canonical_reason().unwrap_or("unknown status").to_string()
}
