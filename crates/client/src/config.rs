//! Client configuration
//!
//! Configuration is an explicit struct passed at construction, never a
//! process-global. [`ClientConfig::from_env`] is a convenience for callers
//! that keep their app registration in `BANDAPI_*` environment variables.

use std::env;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::errors::{BandError, Result};

/// Production authorization server.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://auth.band.us";

/// Production resource API server.
pub const DEFAULT_API_BASE_URL: &str = "https://openapi.band.us";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one client session.
///
/// Base URLs default to the production endpoints and exist as fields so tests
/// can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// OAuth client id from the BAND developer console.
    pub client_id: String,

    /// OAuth client secret paired with `client_id`.
    pub client_secret: String,

    /// Redirect URI registered for the app; the interactive login sends the
    /// authorization code here.
    pub redirect_uri: String,

    /// Base URL of the authorization server.
    pub auth_base_url: String,

    /// Base URL of the resource API.
    pub api_base_url: String,

    /// Per-request timeout applied to the underlying HTTP client.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with production base URLs and the default
    /// timeout.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the authorization server base URL.
    #[must_use]
    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into();
        self
    }

    /// Override the resource API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the `BANDAPI_CLIENT_ID`,
    /// `BANDAPI_CLIENT_SECRET` and `BANDAPI_REDIRECT_URL` environment
    /// variables.
    ///
    /// # Errors
    /// Returns [`BandError::InvalidInput`] naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        let client_id = required_env("BANDAPI_CLIENT_ID")?;
        let client_secret = required_env("BANDAPI_CLIENT_SECRET")?;
        let redirect_uri = required_env("BANDAPI_REDIRECT_URL")?;
        Ok(Self::new(client_id, client_secret, redirect_uri))
    }

    /// `Basic base64(client_id:client_secret)` header value used by the token
    /// exchanges. The BAND docs never name this header; it is required for
    /// both grant types.
    #[must_use]
    pub(crate) fn basic_auth_header(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", BASE64.encode(pair))
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| BandError::InvalidInput(format!("{key} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::new("client123", "secret456", "http://localhost/callback")
    }

    #[test]
    fn defaults_point_at_production() {
        let config = test_config();
        assert_eq!(config.auth_base_url, "https://auth.band.us");
        assert_eq!(config.api_base_url, "https://openapi.band.us");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_urls_are_overridable() {
        let config = test_config()
            .with_auth_base_url("http://127.0.0.1:9000")
            .with_api_base_url("http://127.0.0.1:9001")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.auth_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9001");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn basic_auth_header_encodes_id_and_secret() {
        let config = test_config();
        // base64("client123:secret456")
        assert_eq!(config.basic_auth_header(), "Basic Y2xpZW50MTIzOnNlY3JldDQ1Ng==");
    }
}
