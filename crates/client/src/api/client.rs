//! High-level client: typed operations over the retry-once pipeline
//!
//! [`BandClient`] owns the credential state for one session. Every operation
//! funnels through [`BandClient::request`]: on an unauthorized outcome the
//! client refreshes the credential through its [`AuthFlow`] and reissues the
//! identical envelope exactly once. A second rejection is fatal — there is no
//! refresh loop.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{CommentsQuery, NewComment, NewPost, PostsQuery, RequestEnvelope};
use super::executor::{ApiOutcome, RequestExecutor};
use super::pagination::PostPages;
use super::types::{
    Ack, Album, BandList, BandSummary, Comment, CreatedPost, Page, Permission, PermissionList,
    Photo, Post, Profile,
};
use crate::auth::{AuthClient, AuthFlow, Credential, TokenStore};
use crate::config::ClientConfig;
use crate::errors::{BandError, Result};

/// BAND API client for one authenticated session.
///
/// Holds its own [`TokenStore`]; nothing is shared across client instances.
/// One client per task — the refresh path swaps the credential, and
/// concurrent use of a single instance from several tasks is not a supported
/// contract.
pub struct BandClient {
    executor: RequestExecutor,
    auth: Arc<dyn AuthFlow>,
    tokens: TokenStore,
}

impl BandClient {
    /// Create a client from a full credential (typically the result of an
    /// authorization-code exchange).
    ///
    /// # Errors
    /// Returns [`BandError::Network`] if the HTTP clients cannot be built.
    pub fn new(config: ClientConfig, credential: Credential) -> Result<Self> {
        let executor = RequestExecutor::new(&config)?;
        let auth = Arc::new(AuthClient::new(config)?);
        Ok(Self { executor, auth, tokens: TokenStore::with_credential(credential) })
    }

    /// Create a client from a bare pre-existing access token.
    ///
    /// Without a refresh token the first unauthorized outcome ends the
    /// session with [`BandError::AuthExpired`].
    ///
    /// # Errors
    /// Returns [`BandError::Network`] if the HTTP clients cannot be built.
    pub fn from_access_token(config: ClientConfig, access_token: impl Into<String>) -> Result<Self> {
        Self::new(config, Credential::from_access_token(access_token))
    }

    /// Create a client with a caller-supplied [`AuthFlow`] (tests, alternate
    /// authorization servers).
    ///
    /// # Errors
    /// Returns [`BandError::Network`] if the HTTP client cannot be built.
    pub fn with_auth_flow(
        config: &ClientConfig,
        auth: Arc<dyn AuthFlow>,
        credential: Credential,
    ) -> Result<Self> {
        let executor = RequestExecutor::new(config)?;
        Ok(Self { executor, auth, tokens: TokenStore::with_credential(credential) })
    }

    /// Clone of the current credential, e.g. for handing to the next session.
    pub async fn credential(&self) -> Option<Credential> {
        self.tokens.snapshot().await
    }

    /// Issue an envelope, refreshing and retrying once if the access token is
    /// rejected. Worst case three round trips: original call, refresh
    /// exchange, retried call.
    async fn request(&self, envelope: &RequestEnvelope) -> Result<Value> {
        let access_token = self.tokens.access_token().await?;

        match self.executor.execute(envelope, &access_token).await? {
            ApiOutcome::Success(payload) => Ok(payload),
            ApiOutcome::Failure { code, message } => Err(BandError::Api { code, message }),
            ApiOutcome::Unauthorized => self.refresh_and_retry(envelope).await,
        }
    }

    async fn refresh_and_retry(&self, envelope: &RequestEnvelope) -> Result<Value> {
        // Without a refresh token a network refresh attempt would be
        // pointless; fail before touching the wire.
        let Some(refresh_token) = self.tokens.refresh_token().await else {
            return Err(BandError::AuthExpired);
        };

        debug!(path = envelope.path, "access token rejected, refreshing");
        let credential = self.auth.exchange_refresh_token(&refresh_token).await?;
        self.tokens.replace(credential).await;

        let access_token = self.tokens.access_token().await?;
        match self.executor.execute(envelope, &access_token).await {
            Ok(ApiOutcome::Success(payload)) => Ok(payload),
            Ok(ApiOutcome::Failure { code, message }) => Err(BandError::Api { code, message }),
            Ok(ApiOutcome::Unauthorized) => {
                // Still rejected with a fresh token: the session is not
                // recoverable, and looping would only hammer the token
                // endpoint.
                warn!(path = envelope.path, "retried call still unauthorized");
                Err(BandError::AuthExpired)
            }
            Err(BandError::Network(_) | BandError::Parse(_)) => Err(BandError::AuthExpired),
            Err(other) => Err(other),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, envelope: &RequestEnvelope) -> Result<T> {
        let payload = self.request(envelope).await?;
        serde_json::from_value(payload)
            .map_err(|e| BandError::Parse(format!("unexpected payload shape: {e}")))
    }

    /// The caller's profile, band-scoped when `band_key` is given.
    pub async fn get_profile(&self, band_key: Option<&str>) -> Result<Profile> {
        let envelope = RequestEnvelope::get("/v2/profile")
            .opt_param("band_key", band_key.map(str::to_owned));
        self.fetch(&envelope).await
    }

    /// Bands the user belongs to.
    pub async fn get_bands(&self) -> Result<Vec<BandSummary>> {
        let list: BandList = self.fetch(&RequestEnvelope::get("/v2.1/bands")).await?;
        Ok(list.bands)
    }

    /// One page of the posts listing. Most callers want [`BandClient::posts`]
    /// instead; this is the single-fetch primitive it is built on.
    pub async fn get_posts(&self, query: &PostsQuery) -> Result<Page<Post>> {
        self.fetch(&query.envelope()).await
    }

    /// Lazy page sequence over a band's posts.
    #[must_use]
    pub fn posts(&self, query: PostsQuery) -> PostPages<'_> {
        PostPages::new(self, query)
    }

    /// One specific post, as the raw payload the API returns for it.
    pub async fn get_post(&self, band_key: &str, post_key: &str) -> Result<Value> {
        let envelope = RequestEnvelope::get("/v2.1/band/post")
            .param("band_key", band_key)
            .param("post_key", post_key);
        self.request(&envelope).await
    }

    /// Create a post.
    ///
    /// The remote enforces roughly a ten second cooldown between writes to
    /// the same band; pacing is the caller's responsibility, the client does
    /// not throttle.
    pub async fn create_post(&self, post: &NewPost) -> Result<CreatedPost> {
        self.fetch(&post.envelope()).await
    }

    /// Delete a post. Same caller-paced ~10 s write cooldown as
    /// [`BandClient::create_post`]. Posts written on the web UI cannot be
    /// deleted through the API.
    pub async fn delete_post(&self, band_key: &str, post_key: &str) -> Result<Ack> {
        let envelope = RequestEnvelope::post("/v2/band/post/remove")
            .param("band_key", band_key)
            .param("post_key", post_key);
        self.fetch(&envelope).await
    }

    /// One page of a post's comments.
    pub async fn get_comments(&self, query: &CommentsQuery) -> Result<Page<Comment>> {
        self.fetch(&query.envelope()).await
    }

    /// Create a comment. Same caller-paced ~10 s write cooldown as
    /// [`BandClient::create_post`].
    pub async fn create_comment(&self, comment: &NewComment) -> Result<Ack> {
        self.fetch(&comment.envelope()).await
    }

    /// Delete a comment. Same caller-paced ~10 s write cooldown as
    /// [`BandClient::create_post`].
    pub async fn delete_comment(
        &self,
        band_key: &str,
        post_key: &str,
        comment_key: &str,
    ) -> Result<Ack> {
        let envelope = RequestEnvelope::post("/v2/band/post/comment/remove")
            .param("band_key", band_key)
            .param("post_key", post_key)
            .param("comment_key", comment_key);
        self.fetch(&envelope).await
    }

    /// Whether the user holds `permission` in the band.
    ///
    /// The permission name is validated against the closed set before any
    /// network call.
    ///
    /// # Errors
    /// [`BandError::InvalidInput`] for a name outside
    /// `posting`/`commenting`/`contents_deletion`.
    pub async fn check_permission(&self, band_key: &str, permission: &str) -> Result<bool> {
        let permission: Permission = permission.parse()?;

        let envelope = RequestEnvelope::get("/v2/band/permissions")
            .param("band_key", band_key)
            .param("permissions", permission.as_str());
        let granted: PermissionList = self.fetch(&envelope).await?;

        Ok(granted.permissions.iter().any(|name| name == permission.as_str()))
    }

    /// One page of the band's photo albums.
    pub async fn get_albums(&self, band_key: &str, after: Option<&str>) -> Result<Page<Album>> {
        let envelope = RequestEnvelope::get("/v2/band/albums")
            .param("band_key", band_key)
            .opt_param("after", after.map(str::to_owned));
        self.fetch(&envelope).await
    }

    /// One page of photos, album-scoped when `album_key` is given.
    pub async fn get_photos(
        &self,
        band_key: &str,
        album_key: Option<&str>,
        after: Option<&str>,
    ) -> Result<Page<Photo>> {
        let envelope = RequestEnvelope::get("/v2/band/album/photos")
            .param("band_key", band_key)
            .opt_param("photo_album_key", album_key.map(str::to_owned))
            .opt_param("after", after.map(str::to_owned));
        self.fetch(&envelope).await
    }
}
