//! Client construction
//!
//! [`configure`] is the entry point the host orchestration layer calls once.
//! The resulting [`Client`] owns a single credential pool and a single HTTP
//! client; clones share both, so concurrent callers rotate through the same
//! cursor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rulegate_core::ReconciliationDriver;
use rulegate_domain::constants::ENV_API_TOKENS;
use rulegate_domain::{ProviderConfig, Result, RulegateError, ValidationError};
use tracing::info;

use crate::config::resolve_credentials;
use crate::http::{ApiClient, AuthenticatingTransport, ReqwestTransport, Transport};
use crate::rulesets::RulesetReconciler;
use crate::validator::{validate_expression, RemoteExpressionValidator};

const USER_AGENT: &str = concat!("rulegate/", env!("CARGO_PKG_VERSION"));

/// Build a client with default endpoint and timeout.
///
/// An empty `credentials` list falls back to the comma-separated
/// `CF_API_TOKENS` environment variable.
///
/// # Errors
/// Returns [`RulegateError::Config`] when no credential is available from
/// either source or `account_id` is empty. No HTTP client is constructed in
/// that case.
pub fn configure(credentials: &[String], account_id: &str) -> Result<Client> {
    Client::from_config(&ProviderConfig::new(credentials.to_vec(), account_id))
}

/// Configured access to the remote management API.
#[derive(Clone)]
pub struct Client {
    api: Arc<ApiClient>,
    account_id: String,
    pool_size: usize,
}

impl Client {
    /// Build a client from full provider settings, with the
    /// `CF_API_TOKENS` environment fallback.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let fallback = std::env::var(ENV_API_TOKENS).ok();
        Self::build_with(config, fallback.as_deref(), |timeout| {
            ReqwestTransport::builder().timeout(timeout).user_agent(USER_AGENT).build()
        })
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// Credentials and account are checked before `make_transport` runs.
    pub fn build_with<T, F>(
        config: &ProviderConfig,
        env_fallback: Option<&str>,
        make_transport: F,
    ) -> Result<Self>
    where
        T: Transport + 'static,
        F: FnOnce(Duration) -> Result<T>,
    {
        let account_id = config.account_id.trim();
        if account_id.is_empty() {
            return Err(RulegateError::Config("account_id must not be empty".into()));
        }
        let credentials = resolve_credentials(&config.api_tokens, env_fallback)?;

        let inner = make_transport(Duration::from_secs(config.timeout_secs))?;
        let transport = AuthenticatingTransport::new(inner, &credentials)?;
        let pool_size = transport.pool_size();
        let api = ApiClient::new(Arc::new(transport), &config.base_url)?;

        info!(pool_size, base_url = %api.base_url(), "client configured");
        Ok(Self { api: Arc::new(api), account_id: account_id.to_string(), pool_size })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Number of credentials in the rotation.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Validate one expression against the configured account.
    pub fn validate_expression(
        &self,
        expression: &str,
    ) -> std::result::Result<(), ValidationError> {
        validate_expression(&self.api, &self.account_id, expression)
    }

    pub fn validator(&self) -> RemoteExpressionValidator {
        RemoteExpressionValidator::new(Arc::clone(&self.api), self.account_id.clone())
    }

    pub fn rulesets(&self) -> RulesetReconciler {
        RulesetReconciler::new(Arc::clone(&self.api))
    }

    /// Validation-gated lifecycle driver sharing this client's pool.
    pub fn driver(&self) -> ReconciliationDriver {
        ReconciliationDriver::new(Arc::new(self.rulesets()), Arc::new(self.validator()))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("account_id", &self.account_id)
            .field("pool_size", &self.pool_size)
            .field("base_url", &self.api.base_url().as_str())
            .finish()
    }
}
