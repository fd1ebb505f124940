/// In-memory implementation of the object-store gateway
///
/// Backs tests and embedding demos with the same contract the REST gateway
/// fulfills, including the whole-object overwrite semantics on post
/// updates.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{FileRef, Post, User};
use crate::session::Session;

use super::{FeedQuery, NewPostRecord, ObjectStore};

#[derive(Default)]
struct Store {
    /// username -> (account, password)
    accounts: HashMap<String, (User, String)>,
    /// session token -> user id
    sessions: HashMap<String, String>,
    posts: Vec<Post>,
    files: HashMap<String, Vec<u8>>,
}

#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Store>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that `login` will accept.
    pub async fn seed_user(&self, username: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            last_posted_at: None,
        };
        let mut store = self.inner.lock().await;
        store
            .accounts
            .insert(username.to_string(), (user.clone(), password.to_string()));
        user
    }

    /// Insert a fully formed post, bypassing the composition flow. Used to
    /// arrange feed windows with specific creation timestamps.
    pub async fn seed_post(&self, post: Post) {
        self.inner.lock().await.posts.push(post);
    }

    pub async fn post(&self, id: &str) -> Option<Post> {
        let store = self.inner.lock().await;
        store.posts.iter().find(|p| p.id == id).cloned()
    }

    pub async fn stored_file(&self, name: &str) -> Option<Vec<u8>> {
        self.inner.lock().await.files.get(name).cloned()
    }
}

impl Store {
    fn account_by_id(&self, user_id: &str) -> Option<&User> {
        self.accounts
            .values()
            .find(|(user, _)| user.id == user_id)
            .map(|(user, _)| user)
    }
}

#[async_trait]
impl ObjectStore for MemoryGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let mut store = self.inner.lock().await;
        let user = match store.accounts.get(username) {
            Some((user, stored)) if stored == password => user.clone(),
            _ => return Err(AppError::Unauthorized("invalid username/password".into())),
        };

        let token = Uuid::new_v4().simple().to_string();
        store.sessions.insert(token.clone(), user.id.clone());
        Ok(Session::new(user, token))
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        self.inner.lock().await.sessions.remove(&session.token);
        Ok(())
    }

    async fn upload_image(&self, name: &str, bytes: Vec<u8>) -> Result<FileRef> {
        let stored_name = format!("{}-{name}", Uuid::new_v4().simple());
        let url = format!("memory://files/{stored_name}");

        let mut store = self.inner.lock().await;
        store.files.insert(stored_name.clone(), bytes);
        Ok(FileRef {
            name: stored_name,
            url: Some(url),
        })
    }

    async fn create_post(&self, record: &NewPostRecord, _session: &Session) -> Result<Post> {
        let mut store = self.inner.lock().await;
        let author = store
            .account_by_id(&record.author_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", record.author_id)))?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().simple().to_string(),
            created_at: now,
            updated_at: now,
            caption: record.caption.clone(),
            author,
            image: record.image.clone(),
            location: record.location,
            comments: None,
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: &Post, _session: &Session) -> Result<Post> {
        let mut store = self.inner.lock().await;
        let stored = store
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post.id)))?;

        // Whole-object replace, matching the remote store's semantics.
        let mut saved = post.clone();
        saved.updated_at = Utc::now();
        *stored = saved.clone();
        Ok(saved)
    }

    async fn update_last_posted(
        &self,
        user: &User,
        at: DateTime<Utc>,
        _session: &Session,
    ) -> Result<User> {
        let mut store = self.inner.lock().await;
        let (stored, _) = store
            .accounts
            .get_mut(&user.username)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user.username)))?;

        stored.last_posted_at = Some(at);
        Ok(stored.clone())
    }

    async fn find_posts(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        let store = self.inner.lock().await;
        let mut matching: Vec<Post> = store
            .posts
            .iter()
            .filter(|p| p.created_at >= query.cutoff)
            .cloned()
            .collect();

        // Eager author resolution returns the current user record, not the
        // snapshot embedded at creation time.
        for post in &mut matching {
            if let Some(author) = store.account_by_id(&post.author.id) {
                post.author = author.clone();
            }
        }

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(query.limit as usize);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn draft(author_id: &str) -> NewPostRecord {
        NewPostRecord {
            caption: Some("sunset".into()),
            image: FileRef {
                name: "image.jpg".into(),
                url: Some("memory://files/image.jpg".into()),
            },
            location: Some(GeoPoint {
                latitude: 25.76,
                longitude: -80.19,
            }),
            author_id: author_id.to_string(),
        }
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let gateway = MemoryGateway::new();
        gateway.seed_user("lou", "hunter2").await;

        let err = gateway.login("lou", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn created_posts_come_back_from_the_feed_query() {
        let gateway = MemoryGateway::new();
        let user = gateway.seed_user("lou", "hunter2").await;
        let session = gateway.login("lou", "hunter2").await.unwrap();

        let post = gateway.create_post(&draft(&user.id), &session).await.unwrap();
        assert_eq!(post.author.username, "lou");

        let query = FeedQuery {
            cutoff: Utc::now() - chrono::Duration::hours(24),
            limit: 10,
        };
        let posts = gateway.find_posts(&query).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, post.id);
    }

    #[tokio::test]
    async fn feed_query_resolves_the_current_author_record() {
        let gateway = MemoryGateway::new();
        let user = gateway.seed_user("lou", "hunter2").await;
        let session = gateway.login("lou", "hunter2").await.unwrap();

        let post = gateway.create_post(&draft(&user.id), &session).await.unwrap();
        assert_eq!(post.author.last_posted_at, None);

        gateway
            .update_last_posted(&user, post.created_at, &session)
            .await
            .unwrap();

        let query = FeedQuery {
            cutoff: Utc::now() - chrono::Duration::hours(24),
            limit: 10,
        };
        let posts = gateway.find_posts(&query).await.unwrap();
        assert_eq!(posts[0].author.last_posted_at, Some(post.created_at));
    }

    #[tokio::test]
    async fn update_post_replaces_the_stored_record() {
        let gateway = MemoryGateway::new();
        let user = gateway.seed_user("lou", "hunter2").await;
        let session = gateway.login("lou", "hunter2").await.unwrap();

        let mut post = gateway.create_post(&draft(&user.id), &session).await.unwrap();
        post.comments = Some(vec![crate::models::Comment {
            username: "ana".into(),
            content: "nice".into(),
        }]);

        gateway.update_post(&post, &session).await.unwrap();
        let stored = gateway.post(&post.id).await.unwrap();
        assert_eq!(stored.comment_list().len(), 1);
    }
}
