//! Outgoing request descriptions
//!
//! Every operation builds a [`RequestEnvelope`]. Parameters with an absent
//! value are omitted from the wire entirely — the remote treats an explicitly
//! empty parameter differently from a missing one on some endpoints, so the
//! omission in [`RequestEnvelope::present`] is a contract, not a convenience.

/// HTTP method of an envelope. The API only ever uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters travel in the query string.
    Get,
    /// Parameters travel in a form-encoded body.
    Post,
}

/// One outgoing API request: method, endpoint path, parameter set.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// Request method.
    pub method: HttpMethod,
    /// Endpoint path under the API base URL, e.g. `/v2/profile`.
    pub path: &'static str,
    params: Vec<(&'static str, Option<String>)>,
}

impl RequestEnvelope {
    /// Start a GET envelope.
    #[must_use]
    pub fn get(path: &'static str) -> Self {
        Self { method: HttpMethod::Get, path, params: Vec::new() }
    }

    /// Start a POST envelope.
    #[must_use]
    pub fn post(path: &'static str) -> Self {
        Self { method: HttpMethod::Post, path, params: Vec::new() }
    }

    /// Add a parameter that is always sent.
    #[must_use]
    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, Some(value.into())));
        self
    }

    /// Add a parameter that is dropped from the wire when absent.
    #[must_use]
    pub fn opt_param(mut self, key: &'static str, value: Option<String>) -> Self {
        self.params.push((key, value));
        self
    }

    /// The parameters that made the cut, in insertion order.
    #[must_use]
    pub fn present(&self) -> Vec<(&'static str, String)> {
        self.params
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (*key, v.clone())))
            .collect()
    }
}

/// Percent-encode literal spaces.
///
/// The post/comment creation endpoints mishandle literal spaces in some
/// locales; encoding them up front is a correctness-preserving transform,
/// not formatting.
#[must_use]
pub(crate) fn encode_spaces(text: &str) -> String {
    text.replace(' ', "%20")
}

/// Query for the posts listing.
#[derive(Debug, Clone)]
pub struct PostsQuery {
    /// Band to list posts from.
    pub band_key: String,
    /// Locale hint for the listing; defaults to `ko_KR`, the service's home
    /// locale.
    pub locale: String,
    /// Opaque resume cursor from a previous page, absent for page one.
    pub after: Option<String>,
    /// Stop after this many items across all pages. The remote page size is
    /// fixed (~20) regardless of any limit sent on the wire.
    pub limit: Option<usize>,
}

impl PostsQuery {
    /// Query for a band with the default locale and no limit.
    #[must_use]
    pub fn new(band_key: impl Into<String>) -> Self {
        Self { band_key: band_key.into(), locale: "ko_KR".to_string(), after: None, limit: None }
    }

    /// Override the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Cap the total number of items the pagination will yield.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn envelope(&self) -> RequestEnvelope {
        RequestEnvelope::get("/v2/band/posts")
            .param("band_key", self.band_key.clone())
            .param("locale", self.locale.clone())
            .opt_param("after", self.after.clone())
            .opt_param("limit", self.limit.map(|l| l.to_string()))
    }
}

/// Query for a post's comment listing.
#[derive(Debug, Clone)]
pub struct CommentsQuery {
    /// Band the post belongs to.
    pub band_key: String,
    /// Post whose comments are listed.
    pub post_key: String,
    /// Sort order; defaults to `+created_at` (oldest first).
    pub sort_by: String,
    /// Opaque resume cursor from a previous page.
    pub after: Option<String>,
}

impl CommentsQuery {
    /// Query with the default sort and no cursor.
    #[must_use]
    pub fn new(band_key: impl Into<String>, post_key: impl Into<String>) -> Self {
        Self {
            band_key: band_key.into(),
            post_key: post_key.into(),
            sort_by: "+created_at".to_string(),
            after: None,
        }
    }

    /// Override the sort order (`+created_at` / `-created_at`).
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Resume from a cursor.
    #[must_use]
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub(crate) fn envelope(&self) -> RequestEnvelope {
        RequestEnvelope::get("/v2/band/post/comments")
            .param("band_key", self.band_key.clone())
            .param("post_key", self.post_key.clone())
            .param("sortby", self.sort_by.clone())
            .opt_param("after", self.after.clone())
    }
}

/// Parameters for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Band to post into.
    pub band_key: String,
    /// Post body. Spaces are percent-encoded on the wire.
    pub content: String,
    /// Whether to push-notify subscribed members; omitted when unset.
    pub do_push: Option<bool>,
}

impl NewPost {
    /// Post with no push preference.
    #[must_use]
    pub fn new(band_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self { band_key: band_key.into(), content: content.into(), do_push: None }
    }

    /// Set the push-notification flag explicitly.
    #[must_use]
    pub fn with_push(mut self, do_push: bool) -> Self {
        self.do_push = Some(do_push);
        self
    }

    pub(crate) fn envelope(&self) -> RequestEnvelope {
        // The endpoint expects the literal strings "true"/"false", not a
        // form-encoded boolean.
        let do_push = self.do_push.map(|push| if push { "true" } else { "false" }.to_string());

        RequestEnvelope::post("/v2.2/band/post/create")
            .param("band_key", self.band_key.clone())
            .param("content", encode_spaces(&self.content))
            .opt_param("do_push", do_push)
    }
}

/// Parameters for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Band the post belongs to.
    pub band_key: String,
    /// Post to comment on.
    pub post_key: String,
    /// Comment body. Spaces are percent-encoded on the wire.
    pub body: String,
}

impl NewComment {
    /// Comment on a post.
    #[must_use]
    pub fn new(
        band_key: impl Into<String>,
        post_key: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self { band_key: band_key.into(), post_key: post_key.into(), body: body.into() }
    }

    pub(crate) fn envelope(&self) -> RequestEnvelope {
        RequestEnvelope::post("/v2/band/post/comment/create")
            .param("band_key", self.band_key.clone())
            .param("post_key", self.post_key.clone())
            .param("body", encode_spaces(&self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_params_are_omitted_entirely() {
        let envelope = RequestEnvelope::get("/v2/profile")
            .param("band_key", "B1")
            .opt_param("after", None)
            .opt_param("limit", Some("20".to_string()));

        let sent = envelope.present();
        assert_eq!(sent, vec![("band_key", "B1".to_string()), ("limit", "20".to_string())]);
        assert!(sent.iter().all(|(key, _)| *key != "after"));
    }

    #[test]
    fn posts_query_defaults_to_korean_locale() {
        let envelope = PostsQuery::new("B1").envelope();
        let sent = envelope.present();

        assert_eq!(envelope.method, HttpMethod::Get);
        assert!(sent.contains(&("locale", "ko_KR".to_string())));
        assert!(sent.iter().all(|(key, _)| *key != "after" && *key != "limit"));
    }

    #[test]
    fn new_post_encodes_spaces_and_push_flag() {
        let envelope = NewPost::new("B1", "hello band world").with_push(true).envelope();
        let sent = envelope.present();

        assert_eq!(envelope.method, HttpMethod::Post);
        assert!(sent.contains(&("content", "hello%20band%20world".to_string())));
        assert!(sent.contains(&("do_push", "true".to_string())));
    }

    #[test]
    fn new_post_omits_unset_push_flag() {
        let envelope = NewPost::new("B1", "hi").envelope();
        assert!(envelope.present().iter().all(|(key, _)| *key != "do_push"));
    }

    #[test]
    fn new_comment_encodes_spaces() {
        let envelope = NewComment::new("B1", "P1", "nice post indeed").envelope();
        assert!(envelope.present().contains(&("body", "nice%20post%20indeed".to_string())));
    }

    #[test]
    fn comments_query_defaults_to_oldest_first() {
        let envelope = CommentsQuery::new("B1", "P1").envelope();
        assert!(envelope.present().contains(&("sortby", "+created_at".to_string())));
    }
}
