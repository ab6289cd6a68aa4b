//! Token lifecycle: interactive authorization, exchanges, credential state
//!
//! ```text
//! ┌──────────────┐
//! │  BandClient  │  retry-once-on-unauthorized (api module)
//! └──────┬───────┘
//!        ├──► AuthClient   (code/refresh exchanges, AuthFlow seam)
//!        └──► TokenStore   (replace-on-refresh credential state)
//! ```
//!
//! Acquiring the initial authorization code is a human-in-the-loop step: the
//! front end prints [`AuthClient::authorization_url`], the user logs in via a
//! browser and pastes back the redirect URL, and
//! [`AuthClient::extract_authorization_code`] recovers the code to feed into
//! [`AuthFlow::exchange_code`].

pub mod client;
pub mod token_store;
pub mod types;

pub use client::{AuthClient, AuthFlow};
pub use token_store::TokenStore;
pub use types::{AuthErrorResponse, Credential, TokenResponse};
