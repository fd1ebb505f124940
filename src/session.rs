/// Authenticated session context
///
/// The session is passed explicitly into every service call that acts on
/// behalf of a user; there is no process-global "current user". A session
/// can be rebuilt from a persisted token so a relaunch skips the login
/// screen.
use chrono::{DateTime, Duration, Utc};

use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Whether this user has published a post inside the tracked window
    /// ending at `now`. Drives the comment-composer gating in the feed.
    pub fn has_posted_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.user
            .last_posted_at
            .is_some_and(|at| now.signed_duration_since(at) <= window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(last_posted_at: Option<DateTime<Utc>>) -> User {
        User {
            id: "u1".into(),
            username: "lou".into(),
            last_posted_at,
        }
    }

    #[test]
    fn never_posted_is_outside_window() {
        let session = Session::new(user(None), "tok");
        assert!(!session.has_posted_within(Utc::now(), Duration::hours(24)));
    }

    #[test]
    fn recent_post_is_inside_window() {
        let now = Utc::now();
        let session = Session::new(user(Some(now - Duration::hours(2))), "tok");
        assert!(session.has_posted_within(now, Duration::hours(24)));
    }

    #[test]
    fn stale_post_is_outside_window() {
        let now = Utc::now();
        let session = Session::new(user(Some(now - Duration::hours(25))), "tok");
        assert!(!session.has_posted_within(now, Duration::hours(24)));
    }
}
