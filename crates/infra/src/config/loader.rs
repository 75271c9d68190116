//! Configuration loader
//!
//! Loads provider configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CF_API_TOKENS`: Comma-separated credential pool (required)
//! - `CF_ACCOUNT_ID`: Account used for expression validation (required)
//! - `CF_API_BASE_URL`: Override of the management API base URL
//! - `CF_API_TIMEOUT`: Per-request timeout in seconds
//!
//! ## File Locations
//! The loader probes `rulegate.{toml,json}` then `config.{toml,json}` in the
//! current directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};

use rulegate_domain::constants::{
    CREDENTIAL_SEPARATOR, ENV_ACCOUNT_ID, ENV_API_BASE_URL, ENV_API_TIMEOUT, ENV_API_TOKENS,
};
use rulegate_domain::{ProviderConfig, Result, RulegateError};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["rulegate.toml", "rulegate.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `RulegateError::Config` if configuration cannot be loaded from
/// either source or is invalid.
pub fn load() -> Result<ProviderConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `RulegateError::Config` if a required variable is missing or a
/// value is invalid.
pub fn load_from_env() -> Result<ProviderConfig> {
    let api_tokens = split_credentials(&env_var(ENV_API_TOKENS)?);
    let account_id = env_var(ENV_ACCOUNT_ID)?;

    let mut config = ProviderConfig::new(api_tokens, account_id);
    if let Some(base_url) = optional_env(ENV_API_BASE_URL) {
        config.base_url = base_url;
    }
    if let Some(timeout) = optional_env(ENV_API_TIMEOUT) {
        config.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| RulegateError::Config(format!("Invalid request timeout: {e}")))?;
    }

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `RulegateError::Config` if the file is missing, unreadable,
/// malformed, or incomplete.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ProviderConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RulegateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RulegateError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    validate(parse_config(&contents, &config_path)?)
}

/// Resolve the credential pool.
///
/// An explicit, non-empty list wins. Otherwise `env_fallback` (the raw value
/// of `CF_API_TOKENS`, if set) is split on commas. Entries are trimmed and
/// blanks dropped.
///
/// # Errors
/// Returns `RulegateError::Config` when no credential remains.
pub fn resolve_credentials(
    explicit: &[String],
    env_fallback: Option<&str>,
) -> Result<Vec<String>> {
    let explicit: Vec<String> = explicit
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if !explicit.is_empty() {
        return Ok(explicit);
    }

    let resolved = env_fallback.map(split_credentials).unwrap_or_default();
    if resolved.is_empty() {
        return Err(RulegateError::Config(format!(
            "no API credentials configured; set api_tokens or {ENV_API_TOKENS}"
        )));
    }
    Ok(resolved)
}

fn split_credentials(raw: &str) -> Vec<String> {
    raw.split(CREDENTIAL_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate(config: ProviderConfig) -> Result<ProviderConfig> {
    if config.account_id.trim().is_empty() {
        return Err(RulegateError::Config("account_id must not be empty".into()));
    }
    if config.timeout_secs == 0 {
        return Err(RulegateError::Config("timeout_secs must be greater than zero".into()));
    }
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ProviderConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let parsed: std::result::Result<ProviderConfig, InfraError> = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from),
        "json" => serde_json::from_str(contents).map_err(InfraError::from),
        _ => {
            return Err(RulegateError::Config(format!("Unsupported config format: {extension}")))
        }
    };
    Ok(parsed?)
}

/// Probe the standard locations for a configuration file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_dirs(&dirs)
}

fn probe_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        RulegateError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
