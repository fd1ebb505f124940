/// Data entities for the dayframe client
///
/// These structs mirror the records held by the remote object store.
/// Identifiers and timestamps are assigned by the backend; the client never
/// invents them. A [`Post`] always carries its resolved author and, when the
/// feed query eagerly includes them, its ordered comment list.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic coordinate attached to a post at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reference to an uploaded binary blob. The name is assigned on upload and
/// the URL is filled in by the store once the blob is retrievable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub url: Option<String>,
}

/// A comment on a post. The author is denormalized to a display name rather
/// than a user reference; creation order is the position in the parent
/// post's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub content: String,
}

/// An account on the platform. The credential is only ever sent during
/// login and never stored here. `last_posted_at` stays `None` until the
/// user's first post and is overwritten on each successful one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub last_posted_at: Option<DateTime<Utc>>,
}

/// A published post. The image reference is immutable after creation and
/// the comment list is append-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub caption: Option<String>,
    pub author: User,
    pub image: FileRef,
    pub location: Option<GeoPoint>,
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    /// Comments in creation order, empty when the list is absent.
    pub fn comment_list(&self) -> &[Comment] {
        self.comments.as_deref().unwrap_or_default()
    }
}
