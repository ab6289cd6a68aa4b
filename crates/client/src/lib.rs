//! Client for the BAND social-platform open API.
//!
//! Covers the full session lifecycle: interactive OAuth2 authorization,
//! token exchange and refresh, and typed access to the resource endpoints
//! (profile, bands, posts, comments, albums, photos, permissions) with
//! cursor pagination where the API pages.
//!
//! # Getting started
//!
//! ```no_run
//! use band_client::{AuthFlow, AuthClient, BandClient, ClientConfig, PostsQuery};
//!
//! # async fn run() -> band_client::Result<()> {
//! let config = ClientConfig::from_env()?;
//!
//! // One-time interactive login: send the user to the authorization URL,
//! // read back the redirect they land on.
//! let auth = AuthClient::new(config.clone())?;
//! println!("open {}", auth.authorization_url());
//! # let pasted_redirect = String::new();
//! let code = AuthClient::extract_authorization_code(&pasted_redirect)?;
//! let credential = auth.exchange_code(&code).await?;
//!
//! let client = BandClient::new(config, credential)?;
//! let mut pages = client.posts(PostsQuery::new("BAND_KEY").with_limit(50));
//! while let Some(posts) = pages.next_page().await? {
//!     for post in posts {
//!         println!("{}: {:?}", post.post_key, post.content);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Expired access tokens are handled transparently: when the remote rejects
//! one, [`BandClient`] refreshes through the stored refresh token and retries
//! the call once. Sessions created from a bare access token (no refresh
//! token) instead fail with [`BandError::AuthExpired`].

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;

pub use api::{
    Ack, Album, ApiOutcome, Author, BandClient, BandSummary, Comment, CommentsQuery, CreatedPost,
    NewComment, NewPost, Page, Permission, PermissionList, Photo, Post, PostPages, PostsQuery,
    Profile, RequestExecutor,
};
pub use auth::{AuthClient, AuthFlow, Credential, TokenResponse, TokenStore};
pub use config::ClientConfig;
pub use errors::{AuthFailureReason, BandError, Result};
