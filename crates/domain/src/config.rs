//! Provider configuration structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Settings supplied by the host orchestration layer.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Credential pool used round-robin for every outbound call.
    #[serde(default)]
    pub api_tokens: Vec<String>,
    pub account_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request deadline enforced by the underlying HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ProviderConfig {
    pub fn new(api_tokens: Vec<String>, account_id: impl Into<String>) -> Self {
        Self {
            api_tokens,
            account_id: account_id.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

// Tokens are secrets; keep them out of logs and panic messages.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_tokens", &format_args!("[{} redacted]", self.api_tokens.len()))
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
