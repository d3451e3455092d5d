//! Cart service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATLVS_CART_API_URL` - Base URL of the upstream cart API
//!
//! ## Optional
//! - `ATLVS_CART_API_TOKEN` - Bearer token for the upstream cart API
//! - `ATLVS_HOST` - Bind address (default: 127.0.0.1)
//! - `ATLVS_PORT` - Listen port (default: 3000)
//! - `ATLVS_SNAPSHOT_DIR` - Directory holding the local cart snapshot (default: .)
//! - `ATLVS_TAX_RATE` - Flat tax rate as a fraction (default: 0.08)
//! - `ATLVS_FALLBACK_CURRENCY` - Currency assumed for items without one (default: USD)
//! - `ATLVS_FETCH_TIMEOUT_SECS` - Upstream fetch timeout in seconds (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use atlvs_core::{CurrencyCode, TaxPolicy};
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart service configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream cart API configuration
    pub upstream: UpstreamConfig,
    /// Directory holding the local cart snapshot
    pub snapshot_dir: PathBuf,
    /// Flat tax policy applied to every totals computation
    pub tax_policy: TaxPolicy,
    /// Currency assumed for line items that arrive without one
    pub fallback_currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Upstream cart API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the upstream cart API
    pub base_url: Url,
    /// Optional bearer token for the upstream API
    pub api_token: Option<SecretString>,
    /// Timeout applied to each upstream fetch
    pub fetch_timeout: Duration,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ATLVS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ATLVS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ATLVS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ATLVS_PORT".to_string(), e.to_string()))?;

        let upstream = UpstreamConfig::from_env()?;
        let snapshot_dir = PathBuf::from(get_env_or_default("ATLVS_SNAPSHOT_DIR", "."));
        let tax_policy = TaxPolicy::new(parse_tax_rate(&get_env_or_default(
            "ATLVS_TAX_RATE",
            "0.08",
        ))?);
        let fallback_currency =
            CurrencyCode::new(&get_env_or_default("ATLVS_FALLBACK_CURRENCY", "USD")).map_err(
                |e| ConfigError::InvalidEnvVar("ATLVS_FALLBACK_CURRENCY".to_string(), e.to_string()),
            )?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            upstream,
            snapshot_dir,
            tax_policy,
            fallback_currency,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl UpstreamConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = Url::parse(&get_required_env("ATLVS_CART_API_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("ATLVS_CART_API_URL".to_string(), e.to_string())
        })?;
        let api_token = get_optional_env("ATLVS_CART_API_TOKEN").map(SecretString::from);
        let fetch_timeout_secs = get_env_or_default("ATLVS_FETCH_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ATLVS_FETCH_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            api_token,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
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

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the flat tax rate.
fn parse_tax_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let rate = raw.parse::<Decimal>().map_err(|e| {
        ConfigError::InvalidEnvVar("ATLVS_TAX_RATE".to_string(), e.to_string())
    })?;
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "ATLVS_TAX_RATE".to_string(),
            format!("must be a fraction in [0, 1), got {rate}"),
        ));
    }
    Ok(rate)
}
