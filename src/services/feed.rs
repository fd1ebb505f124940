/// Feed retrieval service
///
/// The feed is a single time-boxed query: the newest posts of the last 24
/// hours, capped at one page, authors and comments resolved in the same
/// round trip. Success replaces the caller's post list wholesale; there is
/// no incremental merge. Callers re-invoke this on view activation,
/// explicit refresh, and every `PostPublished` event.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::gateway::{FeedQuery, ObjectStore};
use crate::models::Post;

/// Posts older than this never appear in the feed.
pub const FEED_WINDOW_HOURS: i64 = 24;

/// Maximum number of posts a feed query returns.
pub const FEED_PAGE_SIZE: u32 = 10;

pub fn feed_window() -> Duration {
    Duration::hours(FEED_WINDOW_HOURS)
}

pub struct FeedService {
    store: Arc<dyn ObjectStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch the posts created within the window ending at `now`, newest
    /// first. Failures are surfaced to the caller once; there is no
    /// automatic retry.
    pub async fn fetch_feed(&self, now: DateTime<Utc>) -> Result<Vec<Post>> {
        let query = FeedQuery::window_ending_at(now, feed_window(), FEED_PAGE_SIZE);
        let posts = self.store.find_posts(&query).await.map_err(|err| {
            tracing::warn!("feed query failed: {err}");
            err
        })?;

        tracing::debug!(count = posts.len(), "feed refreshed");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockObjectStore;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn queries_a_24_hour_window_of_ten_posts() {
        let now: DateTime<Utc> = "2024-09-10T12:00:00Z".parse().unwrap();
        let expected = FeedQuery {
            cutoff: "2024-09-09T12:00:00Z".parse().unwrap(),
            limit: 10,
        };

        let mut store = MockObjectStore::new();
        store
            .expect_find_posts()
            .with(eq(expected))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let feed = FeedService::new(Arc::new(store));
        let posts = tokio_test::assert_ok!(feed.fetch_feed(now).await);
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn query_failures_are_surfaced_unchanged() {
        let mut store = MockObjectStore::new();
        store
            .expect_find_posts()
            .returning(|_| Err(crate::AppError::Remote("store is down".into())));

        let feed = FeedService::new(Arc::new(store));
        let err = tokio_test::assert_err!(feed.fetch_feed(Utc::now()).await);
        assert!(matches!(err, crate::AppError::Remote(_)));
    }
}
