//! Typed payloads returned by the resource endpoints
//!
//! Shapes follow what the API actually returns; fields the API only sends in
//! some contexts are `Option`. Unknown fields are ignored on decode.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::BandError;

/// The caller's profile, band-scoped when a `band_key` was supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
    /// Stable user identifier.
    pub user_key: Option<String>,
    /// Whether the user installed the app.
    pub is_app_member: Option<bool>,
    /// Whether the user accepts messages.
    pub message_allowed: Option<bool>,
    /// Join timestamp, only present for band-scoped lookups.
    pub member_joined_at: Option<i64>,
}

/// `result_data` of the bands listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BandList {
    /// Bands the user belongs to.
    pub bands: Vec<BandSummary>,
}

/// One band the user belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct BandSummary {
    /// Stable band identifier used by every other operation.
    pub band_key: String,
    /// Band display name.
    pub name: String,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Member count.
    pub member_count: Option<i64>,
}

/// Author of a post or comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: Option<String>,
    /// Stable user identifier.
    pub user_key: Option<String>,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
}

/// One post in a band.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Stable post identifier.
    pub post_key: String,
    /// Post body.
    pub content: Option<String>,
    /// Post author.
    pub author: Option<Author>,
    /// Creation timestamp (epoch millis).
    pub created_at: Option<i64>,
    /// Number of comments.
    pub comment_count: Option<i64>,
    /// Number of emotions (reactions).
    pub emotion_count: Option<i64>,
    /// Most recent comments, present only when the band surfaces them.
    pub latest_comments: Option<Value>,
}

/// One comment on a post.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Stable comment identifier.
    pub comment_key: String,
    /// Comment body.
    pub content: Option<String>,
    /// Comment author.
    pub author: Option<Author>,
    /// Creation timestamp (epoch millis).
    pub created_at: Option<i64>,
}

/// One photo album in a band.
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    /// Stable album identifier.
    pub photo_album_key: String,
    /// Album display name.
    pub name: Option<String>,
    /// Number of photos in the album.
    pub photo_count: Option<i64>,
    /// Album creator.
    pub author: Option<Author>,
}

/// One photo, either album-scoped or band-wide.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    /// Stable photo identifier.
    pub photo_key: String,
    /// Full-size image URL.
    pub url: Option<String>,
    /// Creation timestamp (epoch millis).
    pub created_at: Option<i64>,
    /// Number of comments on the photo.
    pub comment_count: Option<i64>,
    /// Number of emotions (reactions).
    pub emotion_count: Option<i64>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Items on this page. Empty is a valid successful page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Cursor block; absent on the last page of some endpoints.
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    /// The opaque cursor for the next page, if the listing continues.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|paging| paging.next_params.as_ref())
            .and_then(|params| params.after.as_deref())
    }
}

/// `paging` block of a listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    /// Parameter set for the previous page; unused by this client.
    pub previous_params: Option<Value>,
    /// Parameter set for the next page; absent means no further pages.
    pub next_params: Option<PageParams>,
}

/// Parameters the API suggests for the next page. Only the cursor is
/// consumed; the rest is whatever the caller already sent.
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    /// Opaque continuation token.
    pub after: Option<String>,
}

/// `result_data` of the permissions check.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionList {
    /// Permissions the user holds, out of those asked about.
    #[serde(default = "Vec::new")]
    pub permissions: Vec<String>,
}

/// `result_data` of a successful post creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    /// Key of the created post.
    pub post_key: Option<String>,
}

/// `result_data` of write operations that only acknowledge.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    /// Remote status message, `"success"` on the happy path.
    pub message: Option<String>,
}

/// Band permission names the API knows about. Closed set; anything else is a
/// caller error rejected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// May create posts.
    Posting,
    /// May create comments.
    Commenting,
    /// May delete contents.
    ContentsDeletion,
}

impl Permission {
    /// Wire name of the permission.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posting => "posting",
            Self::Commenting => "commenting",
            Self::ContentsDeletion => "contents_deletion",
        }
    }
}

impl FromStr for Permission {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posting" => Ok(Self::Posting),
            "commenting" => Ok(Self::Commenting),
            "contents_deletion" => Ok(Self::ContentsDeletion),
            other => Err(BandError::InvalidInput(format!(
                "unknown permission {other:?}; expected posting, commenting or contents_deletion"
            ))),
        }
    }
}
