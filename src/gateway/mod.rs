/// Backend gateway
///
/// Every remote interaction goes through the [`ObjectStore`] trait so the
/// services stay independent of the hosted backend actually in use.
/// [`rest::RestGateway`] speaks the store's REST protocol, while
/// [`memory::MemoryGateway`] keeps everything in-process for tests and
/// embedding demos.
pub mod memory;
pub mod query;
pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{FileRef, GeoPoint, Post, User};
use crate::session::Session;

pub use memory::MemoryGateway;
pub use query::FeedQuery;
pub use rest::RestGateway;

/// A post as handed to the store for creation. Identifier and timestamps
/// come back assigned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPostRecord {
    pub caption: Option<String>,
    pub image: FileRef,
    pub location: Option<GeoPoint>,
    pub author_id: String,
}

/// Create/read/update/query contract against the remote object store.
///
/// Each method is one independent remote write or query; nothing here spans
/// multiple entities transactionally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Exchange credentials for an authenticated session.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// Invalidate the session on the backend.
    async fn logout(&self, session: &Session) -> Result<()>;

    /// Upload a named binary blob, returning a retrievable reference.
    async fn upload_image(&self, name: &str, bytes: Vec<u8>) -> Result<FileRef>;

    /// Persist a new post record. The returned post carries the
    /// backend-assigned identifier and timestamps plus its resolved author.
    async fn create_post(&self, record: &NewPostRecord, session: &Session) -> Result<Post>;

    /// Persist `post` as a whole-object update, replacing the stored record.
    async fn update_post(&self, post: &Post, session: &Session) -> Result<Post>;

    /// Overwrite the user's last-posted timestamp (last write wins).
    async fn update_last_posted(
        &self,
        user: &User,
        at: DateTime<Utc>,
        session: &Session,
    ) -> Result<User>;

    /// Time-windowed feed query with eagerly resolved authors and comments.
    async fn find_posts(&self, query: &FeedQuery) -> Result<Vec<Post>>;
}
