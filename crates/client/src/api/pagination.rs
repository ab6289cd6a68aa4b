//! Cursor pagination over the posts listing
//!
//! The remote pages with an opaque `after` cursor and a fixed server-side
//! page size (about 20 items, regardless of what a `limit` parameter says on
//! the wire). [`PostPages`] walks the cursor chain lazily and enforces any
//! item cap client-side by truncating the final page.

use super::client::BandClient;
use super::envelope::PostsQuery;
use super::types::Post;
use crate::errors::Result;

/// Lazy page sequence over a band's posts.
///
/// Created by [`BandClient::posts`]. Each [`PostPages::next_page`] call is
/// one network round trip; nothing is fetched ahead of demand, so a caller
/// that stops early never pays for pages it did not read.
pub struct PostPages<'a> {
    client: &'a BandClient,
    query: PostsQuery,
    after: Option<String>,
    yielded: usize,
    done: bool,
}

impl<'a> PostPages<'a> {
    pub(crate) fn new(client: &'a BandClient, query: PostsQuery) -> Self {
        let after = query.after.clone();
        Self { client, query, after, yielded: 0, done: false }
    }

    /// Whether another [`PostPages::next_page`] call could still yield items.
    ///
    /// `true` is a maybe (the next fetch may come back empty); `false` is
    /// definitive.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.done
    }

    /// Fetch the next page. `Ok(None)` means the sequence is exhausted:
    /// either the remote stopped handing out cursors, a page came back
    /// empty, or the configured item cap was reached.
    ///
    /// # Errors
    /// Any error from the underlying call; the sequence stays resumable only
    /// in the sense that the cursor has not advanced past the failed fetch.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Post>>> {
        if self.done {
            return Ok(None);
        }

        let mut query = self.query.clone();
        query.after = self.after.take();
        let page = self.client.get_posts(&query).await?;

        // Capture the continuation before the items are moved out.
        self.after = page.next_cursor().map(str::to_owned);
        if self.after.is_none() {
            self.done = true;
        }

        let mut items = page.items;
        if items.is_empty() {
            // An empty page is a valid response but also a terminal one.
            self.done = true;
            return Ok(None);
        }

        if let Some(limit) = self.query.limit {
            let remaining = limit.saturating_sub(self.yielded);
            if items.len() >= remaining {
                items.truncate(remaining);
                self.done = true;
            }
        }

        self.yielded += items.len();
        Ok(Some(items))
    }

    /// Drain the remaining pages into one vector.
    ///
    /// Convenience for small listings; prefer the page-at-a-time loop when
    /// the band may hold thousands of posts.
    ///
    /// # Errors
    /// The first error from any page fetch; items from earlier pages are
    /// discarded.
    pub async fn collect_all(mut self) -> Result<Vec<Post>> {
        let mut all = Vec::new();
        while let Some(mut page) = self.next_page().await? {
            all.append(&mut page);
        }
        Ok(all)
    }
}
