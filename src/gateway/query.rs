/// Feed query parameters
///
/// Protocol-neutral description of the one query the client issues: posts
/// created at or after a cutoff, newest first, capped at a fixed page size,
/// with author and comments resolved in the same round trip.
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    /// Oldest creation timestamp (inclusive) a returned post may have.
    pub cutoff: DateTime<Utc>,
    /// Maximum number of posts returned, newest first.
    pub limit: u32,
}

impl FeedQuery {
    /// Query for the window of `window` length ending at `now`.
    pub fn window_ending_at(now: DateTime<Utc>, window: Duration, limit: u32) -> Self {
        Self {
            cutoff: now - window,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_window_before_now() {
        let now = "2024-09-10T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let query = FeedQuery::window_ending_at(now, Duration::hours(24), 10);
        assert_eq!(
            query.cutoff,
            "2024-09-09T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(query.limit, 10);
    }
}
