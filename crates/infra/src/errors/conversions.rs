//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use reqwest::{Method, Url};
use rulegate_domain::{RulegateError, TransportError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RulegateError);

impl From<InfraError> for RulegateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RulegateError> for InfraError {
    fn from(value: RulegateError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRulegateError {
    fn into_rulegate(self) -> RulegateError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

/// Describe a failed exchange without leaking request headers.
pub(crate) fn request_error(method: &Method, url: &Url, err: &HttpError) -> TransportError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failure: {err}")
    } else if err.is_body() || err.is_decode() {
        format!("failed to read response body: {err}")
    } else {
        err.to_string()
    };

    TransportError::Request { method: method.to_string(), url: url.to_string(), message }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RulegateError (client construction) */
/* -------------------------------------------------------------------------- */

impl IntoRulegateError for HttpError {
    fn into_rulegate(self) -> RulegateError {
        if self.is_builder() {
            return RulegateError::Config(format!("invalid HTTP client configuration: {self}"));
        }
        RulegateError::Transport(TransportError::Request {
            method: String::new(),
            url: self.url().map(ToString::to_string).unwrap_or_default(),
            message: self.to_string(),
        })
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rulegate())
    }
}

/* -------------------------------------------------------------------------- */
/* configuration parsing errors → RulegateError */
/* -------------------------------------------------------------------------- */

impl IntoRulegateError for serde_json::Error {
    fn into_rulegate(self) -> RulegateError {
        RulegateError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_rulegate())
    }
}

impl IntoRulegateError for toml::de::Error {
    fn into_rulegate(self) -> RulegateError {
        RulegateError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_rulegate())
    }
}

impl IntoRulegateError for std::io::Error {
    fn into_rulegate(self) -> RulegateError {
        RulegateError::Config(format!("Failed to read config file: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_rulegate())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
