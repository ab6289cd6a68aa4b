//! Authorization-code and refresh-token exchanges
//!
//! The BAND authorization server takes both grant types over GET with a
//! `Basic base64(client_id:client_secret)` header and reports rejection
//! through an `error`/`error_description` body rather than the HTTP status.
//! Neither exchange retries internally; retry policy lives in the API client.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::types::{AuthErrorResponse, Credential, TokenResponse};
use crate::config::ClientConfig;
use crate::errors::{AuthFailureReason, BandError, Result};

/// Token-exchange operations used by the retrying API client.
///
/// Abstracted as a trait so the unauthorized-refresh-retry path can be
/// exercised with a mock flow instead of a live authorization server.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    /// Exchange a one-time authorization code for a credential.
    ///
    /// # Errors
    /// Returns [`BandError::Auth`] when the server rejects the exchange,
    /// [`BandError::Network`]/[`BandError::Parse`] on transport failure.
    async fn exchange_code(&self, code: &str) -> Result<Credential>;

    /// Exchange a refresh token for a fresh credential.
    ///
    /// # Errors
    /// Same classification as [`AuthFlow::exchange_code`]; a stale or revoked
    /// refresh token surfaces as `invalid_grant`.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Credential>;
}

/// HTTP client for the authorization server.
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: ClientConfig,
    http: Client,
}

impl AuthClient {
    /// Create an auth client using the configured timeout.
    ///
    /// # Errors
    /// Returns [`BandError::Network`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BandError::Network(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// URL the user opens in a browser to obtain an authorization code.
    ///
    /// Acquiring the code requires a login session, which is why this step is
    /// interactive: the user completes the login and pastes the redirect URL
    /// back into whatever front end drives this client.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!(
            "{}/oauth2/authorize?response_type=code&client_id={}&redirect_uri={}",
            self.config.auth_base_url, self.config.client_id, self.config.redirect_uri
        )
    }

    /// Extract the `code` query parameter from a pasted redirect URL.
    ///
    /// Takes the segment after the last `=` in the query string; when several
    /// `=` appear only the final segment is used.
    ///
    /// # Errors
    /// Returns [`BandError::InvalidInput`] when the URL does not parse or
    /// carries no query string.
    pub fn extract_authorization_code(redirect_url: &str) -> Result<String> {
        let parsed = Url::parse(redirect_url)
            .map_err(|e| BandError::InvalidInput(format!("invalid redirect url: {e}")))?;
        let query = parsed
            .query()
            .ok_or_else(|| BandError::InvalidInput("redirect url has no query string".to_string()))?;

        query
            .rsplit('=')
            .next()
            .filter(|code| !code.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| BandError::InvalidInput("redirect url carries no code".to_string()))
    }

    async fn token_request(&self, grant_type: &str, params: &[(&str, &str)]) -> Result<Credential> {
        let url = format!("{}/oauth2/token", self.config.auth_base_url);
        debug!(grant_type, "requesting token exchange");

        let response = self
            .http
            .get(&url)
            .query(&[("grant_type", grant_type)])
            .query(params)
            .header(AUTHORIZATION, self.config.basic_auth_header())
            .send()
            .await
            .map_err(|e| BandError::Network(e.to_string()))?;

        let body = response.text().await.map_err(|e| BandError::Network(e.to_string()))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| BandError::Parse(format!("token response was not JSON: {e}")))?;

        // Rejection arrives as an `error` field in the body, not as an HTTP
        // status, so inspect the decoded value before assuming token fields.
        if value.get("error").is_some() {
            let rejection: AuthErrorResponse = serde_json::from_value(value)
                .map_err(|e| BandError::Parse(format!("malformed error response: {e}")))?;
            return Err(classify_rejection(rejection));
        }

        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| BandError::Parse(format!("malformed token response: {e}")))?;

        Ok(token.into())
    }
}

fn classify_rejection(rejection: AuthErrorResponse) -> BandError {
    let reason = match rejection.error.to_lowercase().as_str() {
        "unauthorized" => AuthFailureReason::Unauthorized,
        "invalid_grant" => AuthFailureReason::InvalidGrant,
        other => AuthFailureReason::Other(other.to_string()),
    };

    BandError::Auth { reason, description: rejection.error_description.unwrap_or_default() }
}

#[async_trait]
impl AuthFlow for AuthClient {
    async fn exchange_code(&self, code: &str) -> Result<Credential> {
        let credential = self.token_request("authorization_code", &[("code", code)]).await?;
        info!("authorization code exchange succeeded");
        Ok(credential)
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Credential> {
        let credential =
            self.token_request("refresh_token", &[("refresh_token", refresh_token)]).await?;
        info!("access token refreshed");
        Ok(credential)
    }
}
