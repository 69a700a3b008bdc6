//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FARMGATE_API_URL` - Base URL of the marketplace backend
//!
//! ## Optional
//! - `FARMGATE_API_TOKEN` - Initial bearer token (can also be set later via
//!   [`crate::auth::TokenStore`])
//! - `FARMGATE_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `FARMGATE_CACHE_TTL_SECS` - Catalog cache time-to-live (default: 300)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the marketplace backend (e.g., `https://api.example.farm`)
    pub base_url: Url,
    /// Initial bearer token, if already known at startup
    pub api_token: Option<SecretString>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Time-to-live for cached catalog reads
    pub catalog_cache_ttl: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with default timeouts for a given backend URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_url("FARMGATE_API_URL", &get_required_env("FARMGATE_API_URL")?)?;
        let api_token = get_optional_env("FARMGATE_API_TOKEN").map(SecretString::from);
        let timeout = Duration::from_secs(parse_secs(
            "FARMGATE_HTTP_TIMEOUT_SECS",
            &get_env_or_default("FARMGATE_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?);
        let catalog_cache_ttl = Duration::from_secs(parse_secs(
            "FARMGATE_CACHE_TTL_SECS",
            &get_env_or_default("FARMGATE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        )?);

        Ok(Self {
            base_url,
            api_token,
            timeout,
            catalog_cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a numeric default.
fn get_env_or_default(key: &str, default: u64) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a base URL, requiring an http(s) scheme and a host.
fn parse_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "URL must have a host".to_string(),
        ));
    }
    Ok(url)
}

/// Parse a duration value given in whole seconds.
fn parse_secs(var_name: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}
