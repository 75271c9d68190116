//! Remote expression validation
//!
//! One `POST /accounts/{account}/ruleset-expression/validate` per call, with
//! no caching: validating the same expression twice costs two round trips.

use std::sync::Arc;

use reqwest::Method;
use rulegate_core::ExpressionValidator;
use rulegate_domain::{TransportError, ValidationError, ValidationOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::http::client::ApiMessage;
use crate::http::ApiClient;

#[derive(Debug, Serialize)]
struct ValidationRequest<'a> {
    expression: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

impl From<ValidationResponse> for ValidationOutcome {
    fn from(response: ValidationResponse) -> Self {
        Self {
            success: response.success,
            messages: response.errors.into_iter().map(|e| e.message).collect(),
        }
    }
}

/// Ask the remote system whether `expression` is valid for `account_id`.
///
/// # Errors
/// - [`ValidationError::Rejected`] with the first reported message when the
///   remote answers `success=false`
/// - [`ValidationError::Unspecified`] when it does so without any message
/// - [`ValidationError::Transport`] for network failures, non-2xx statuses,
///   and undecodable bodies
#[instrument(skip_all, fields(account = %account_id))]
pub fn validate_expression(
    client: &ApiClient,
    account_id: &str,
    expression: &str,
) -> Result<(), ValidationError> {
    let segments = ["accounts", account_id, "ruleset-expression", "validate"];
    let response =
        client.send_json(Method::POST, &segments, Some(&ValidationRequest { expression }))?;

    let outcome: ValidationOutcome = response
        .json::<ValidationResponse>()
        .map_err(|err| TransportError::Decode {
            url: client.endpoint(&segments).to_string(),
            message: err.to_string(),
        })?
        .into();

    if outcome.success {
        debug!("expression accepted");
        return Ok(());
    }

    match outcome.first_message().map(str::to_string) {
        Some(message) => Err(ValidationError::Rejected { message, outcome }),
        None => Err(ValidationError::Unspecified { outcome }),
    }
}

/// [`ExpressionValidator`] bound to one account and one shared client.
#[derive(Clone)]
pub struct RemoteExpressionValidator {
    client: Arc<ApiClient>,
    account_id: String,
}

impl RemoteExpressionValidator {
    pub fn new(client: Arc<ApiClient>, account_id: impl Into<String>) -> Self {
        Self { client, account_id: account_id.into() }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl ExpressionValidator for RemoteExpressionValidator {
    fn validate(&self, expression: &str) -> Result<(), ValidationError> {
        validate_expression(&self.client, &self.account_id, expression)
    }
}
