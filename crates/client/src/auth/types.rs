//! Credential types for the BAND authorization server

use std::env;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair with metadata.
///
/// A credential is created by a token exchange (or supplied directly by the
/// caller) and is replaced wholesale when a refresh succeeds; it is never
/// mutated in place. `refresh_token` is absent when the caller brought a
/// pre-existing access token with no way to renew it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Short-lived token authorizing resource calls.
    pub access_token: String,

    /// Longer-lived token used to mint a new access token without re-login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds, as reported by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Absolute expiration timestamp computed from `expires_in` at creation
    /// time. Informational only; staleness is discovered reactively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential, computing `expires_at` from `expires_in`.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    ) -> Self {
        let expires_at = expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        Self { access_token, refresh_token, expires_in, expires_at }
    }

    /// Wrap a pre-existing access token. No refresh token, no known expiry;
    /// once the remote rejects it the session cannot be recovered.
    #[must_use]
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self::new(access_token.into(), None, None)
    }

    /// Load a credential from `BANDAPI_ACCESS_TOKEN` (and, when present,
    /// `BANDAPI_REFRESH_TOKEN`). Returns `None` when no access token is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let access_token = env::var("BANDAPI_ACCESS_TOKEN").ok().filter(|t| !t.is_empty())?;
        let refresh_token = env::var("BANDAPI_REFRESH_TOKEN").ok().filter(|t| !t.is_empty());
        Some(Self::new(access_token, refresh_token, None))
    }

    /// Seconds until the computed expiry, or `None` when no expiry is known.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

/// Raw token response from `/oauth2/token`.
///
/// RFC 6749 shape plus the BAND-specific `user_key` extra.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub user_key: Option<String>,
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token, response.expires_in)
    }
}

/// `error`/`error_description` pair from a rejected token exchange.
#[derive(Debug, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
