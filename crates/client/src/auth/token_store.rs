//! Session credential state with replace-on-refresh semantics

use tokio::sync::RwLock;

use super::types::Credential;
use crate::errors::{BandError, Result};

/// Holds the credential for one client session.
///
/// The credential is swapped wholesale on refresh: an in-flight request that
/// already captured the old access token completes against it, and only the
/// next request observes the replacement. No expiry timer runs proactively;
/// staleness is discovered when the remote rejects a call.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Option<Credential>>,
}

impl TokenStore {
    /// Create an empty store. Every call will fail with
    /// [`BandError::NotAuthenticated`] until a credential is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a credential.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { current: RwLock::new(Some(credential)) }
    }

    /// The current access token.
    ///
    /// # Errors
    /// Returns [`BandError::NotAuthenticated`] when no credential is loaded.
    pub async fn access_token(&self) -> Result<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|c| c.access_token.clone())
            .ok_or(BandError::NotAuthenticated)
    }

    /// The current refresh token, if the credential carries one.
    pub async fn refresh_token(&self) -> Option<String> {
        self.current.read().await.as_ref().and_then(|c| c.refresh_token.clone())
    }

    /// Replace the credential wholesale.
    pub async fn replace(&self, credential: Credential) {
        *self.current.write().await = Some(credential);
    }

    /// Clone of the current credential, if any.
    pub async fn snapshot(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Whether a credential is loaded at all.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_is_not_authenticated() {
        let store = TokenStore::new();

        assert!(!store.is_authenticated().await);
        assert!(matches!(store.access_token().await, Err(BandError::NotAuthenticated)));
        assert!(store.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn replace_swaps_the_whole_credential() {
        let store = TokenStore::with_credential(Credential::new(
            "old_access".to_string(),
            Some("old_refresh".to_string()),
            Some(3600),
        ));

        store.replace(Credential::from_access_token("new_access")).await;

        assert_eq!(store.access_token().await.unwrap(), "new_access");
        // The old refresh token does not survive the swap; replacement is
        // wholesale, not field-by-field.
        assert!(store.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn snapshot_returns_a_clone() {
        let store = TokenStore::with_credential(Credential::from_access_token("access"));

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.access_token, "access");

        // Mutating nothing: the store still answers independently.
        assert_eq!(store.access_token().await.unwrap(), "access");
    }
}
