//! Post feeds → distinct author names.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use moltbook_client::{Post, PostQuery};
use tracing::debug;

use crate::error::ApiResult;
use crate::traits::api::AgentApi;

/// Distinct author names, in first-seen order.
pub type AuthorSet = IndexSet<String>;

/// Reads post feeds and collects the agents who wrote them.
pub struct PostScanner<'a, A: AgentApi> {
    api: &'a A,
    introductions_submolt: &'a str,
    page_size: u32,
}

impl<'a, A: AgentApi> PostScanner<'a, A> {
    pub fn new(api: &'a A, introductions_submolt: &'a str, page_size: u32) -> Self {
        Self {
            api,
            introductions_submolt,
            page_size,
        }
    }

    /// Every author in the introductions feed.
    pub async fn scan_for_all_introduction_authors(&self) -> ApiResult<AuthorSet> {
        let posts = self.introductions().await?;
        let authors = collect_authors(&posts, |_| true);
        debug!(posts = posts.len(), authors = authors.len(), "Scanned introductions");
        Ok(authors)
    }

    /// Authors of introductions created strictly after `since`.
    ///
    /// With no `since`, every introduction counts. Posts without a creation
    /// time are only included in that case.
    pub async fn scan_for_new_introduction_authors(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> ApiResult<AuthorSet> {
        let posts = self.introductions().await?;
        let authors = collect_authors(&posts, |post| is_newer(post, since));
        debug!(
            posts = posts.len(),
            authors = authors.len(),
            since = ?since,
            "Scanned new introductions"
        );
        Ok(authors)
    }

    /// Authors of the most recent posts in any submolt.
    pub async fn scan_for_recently_active_authors(&self) -> ApiResult<AuthorSet> {
        let posts = self
            .api
            .fetch_posts(&PostQuery::newest(self.page_size))
            .await?;
        let authors = collect_authors(&posts, |_| true);
        debug!(posts = posts.len(), authors = authors.len(), "Scanned recent posts");
        Ok(authors)
    }

    async fn introductions(&self) -> ApiResult<Vec<Post>> {
        self.api
            .fetch_posts(&PostQuery::submolt(self.introductions_submolt, self.page_size))
            .await
    }
}

fn is_newer(post: &Post, since: Option<DateTime<Utc>>) -> bool {
    match (since, post.created_at) {
        (None, _) => true,
        (Some(since), Some(created)) => created > since,
        (Some(_), None) => false,
    }
}

fn collect_authors(posts: &[Post], keep: impl Fn(&Post) -> bool) -> AuthorSet {
    posts
        .iter()
        .filter(|&post| keep(post))
        .filter_map(|post| post.author_name())
        .map(str::to_string)
        .collect()
}
