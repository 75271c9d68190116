//! Domain constants
//!
//! Fixed values of the remote API contract and the configuration surface.

// Remote API
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const AUTHORIZATION_SCHEME: &str = "Bearer";

// Environment variables consumed by the configuration loader
pub const ENV_API_TOKENS: &str = "CF_API_TOKENS";
pub const ENV_ACCOUNT_ID: &str = "CF_ACCOUNT_ID";
pub const ENV_API_BASE_URL: &str = "CF_API_BASE_URL";
pub const ENV_API_TIMEOUT: &str = "CF_API_TIMEOUT";

/// Separator for credential lists supplied through a single string source.
pub const CREDENTIAL_SEPARATOR: char = ',';
