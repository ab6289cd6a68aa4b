//! Error types used throughout the client

use std::fmt;

use thiserror::Error;

/// Reason reported by the authorization server when a token exchange is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailureReason {
    /// Client credentials were rejected, usually a wrong client secret.
    Unauthorized,

    /// The authorization code or refresh token was invalid or expired.
    InvalidGrant,

    /// Any other `error` value the server reported. Carried verbatim; the
    /// server is not limited to the two reasons above.
    Other(String),
}

impl fmt::Display for AuthFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::InvalidGrant => write!(f, "invalid_grant"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// Main error type for band-client
#[derive(Error, Debug)]
pub enum BandError {
    /// The authorization or refresh exchange was rejected by the
    /// authorization server.
    #[error("authorization failed ({reason}): {description}")]
    Auth {
        /// Classified `error` field of the rejection body.
        reason: AuthFailureReason,
        /// The server's `error_description`, verbatim.
        description: String,
    },

    /// The access token was rejected and could not be recovered: either no
    /// refresh token is available, or the retried call was rejected again.
    #[error("access token expired and could not be refreshed")]
    AuthExpired,

    /// The remote accepted the credentials but reported a business-logic
    /// failure through its embedded result code.
    #[error("API error: {message}")]
    Api {
        /// Embedded result code (`1` is success, anything else is failure).
        code: i64,
        /// Failure message, prefixed with the numeric code for diagnostics.
        message: String,
    },

    /// Caller error caught before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No credential has been loaded into the client at all.
    #[error("not authenticated (no credential loaded)")]
    NotAuthenticated,

    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for band-client operations
pub type Result<T> = std::result::Result<T, BandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display_includes_reason_and_description() {
        let err = BandError::Auth {
            reason: AuthFailureReason::InvalidGrant,
            description: "The refresh token is invalid".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("invalid_grant"));
        assert!(rendered.contains("The refresh token is invalid"));
    }

    #[test]
    fn api_error_display_uses_prefixed_message() {
        let err = BandError::Api { code: 60104, message: "code 60104: Invalid parameters".to_string() };
        assert_eq!(err.to_string(), "API error: code 60104: Invalid parameters");
    }

    #[test]
    fn other_reason_renders_verbatim() {
        let reason = AuthFailureReason::Other("temporarily_unavailable".to_string());
        assert_eq!(reason.to_string(), "temporarily_unavailable");
    }
}
