//! Upstream cart API client.
//!
//! The remote cart is the source of truth whenever it is reachable.
//! Responses are never cached: cart state is mutable, and a stale read
//! is worse than a fallback to the local snapshot.

use std::future::Future;
use std::pin::Pin;

use atlvs_core::RawCartItem;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::UpstreamConfig;

/// Errors that can occur when reading the upstream cart.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed (network, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("Upstream returned {0}")]
    Status(reqwest::StatusCode),

    /// Response body was not the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Remote cart read seam.
///
/// The session depends on this trait rather than on a concrete HTTP
/// client, so the load/fallback state machine is testable without a
/// network.
pub trait CartBackend: Send + Sync {
    /// Fetch the raw line items of the current cart.
    fn fetch_items(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawCartItem>, UpstreamError>> + Send + '_>>;
}

/// Wire shape of `GET /api/v1/cart`.
///
/// Items stay as raw JSON values here; one malformed entry must not
/// fail the envelope parse.
#[derive(Debug, Deserialize)]
struct CartEnvelope {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// Production [`CartBackend`] backed by `reqwest`.
pub struct UpstreamClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl UpstreamClient {
    /// Create a new upstream cart client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        let endpoint = format!(
            "{}/api/v1/cart",
            config.base_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            client,
            endpoint,
            api_token: config
                .api_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
        })
    }

    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Vec<RawCartItem>, UpstreamError> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Upstream cart API returned non-success status"
            );
            return Err(UpstreamError::Status(status));
        }

        let envelope: CartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(200).collect::<String>(),
                    "Failed to parse upstream cart response"
                );
                return Err(UpstreamError::Parse(e));
            }
        };

        Ok(envelope
            .items
            .into_iter()
            .map(RawCartItem::from_value)
            .collect())
    }
}

impl CartBackend for UpstreamClient {
    fn fetch_items(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawCartItem>, UpstreamError>> + Send + '_>> {
        Box::pin(self.get_cart())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;
    use url::Url;

    fn config(base: &str) -> UpstreamConfig {
        UpstreamConfig {
            base_url: Url::parse(base).expect("url"),
            api_token: Some(SecretString::from("token")),
            fetch_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint_assembly() {
        let client = UpstreamClient::new(&config("https://api.atlvs.app")).expect("client");
        assert_eq!(client.endpoint, "https://api.atlvs.app/api/v1/cart");

        // Trailing slashes don't double up
        let client = UpstreamClient::new(&config("https://api.atlvs.app/")).expect("client");
        assert_eq!(client.endpoint, "https://api.atlvs.app/api/v1/cart");
    }

    #[test]
    fn test_envelope_tolerates_missing_items() {
        let envelope: CartEnvelope = serde_json::from_str("{}").expect("parse");
        assert!(envelope.items.is_empty());

        let envelope: CartEnvelope =
            serde_json::from_str(r#"{"items": [{"id": "a"}, "junk"]}"#).expect("parse");
        assert_eq!(envelope.items.len(), 2);
    }
}
