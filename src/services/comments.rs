/// Comment append service
///
/// A comment is appended client-side to the post's list (denormalized to
/// the commenter's display name) and the post is persisted as a
/// whole-object update. Concurrent commenters can overwrite each other's
/// just-added comments depending on backend semantics; that is an accepted
/// limitation of the storage shape, deliberately left as-is.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::gateway::ObjectStore;
use crate::models::{Comment, Post};
use crate::session::Session;

pub struct CommentService {
    store: Arc<dyn ObjectStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Append `text` as a comment by the session user and persist the
    /// mutated post. Returns the updated post for the caller to re-render
    /// from.
    pub async fn add_comment(&self, post: &Post, text: &str, session: &Session) -> Result<Post> {
        let content = text.trim();
        if content.is_empty() {
            return Err(AppError::Validation("comment text must not be empty".into()));
        }

        let mut updated = post.clone();
        updated
            .comments
            .get_or_insert_with(Vec::new)
            .push(Comment {
                username: session.user.username.clone(),
                content: content.to_string(),
            });

        let saved = self.store.update_post(&updated, session).await?;
        tracing::debug!(post_id = %saved.id, "comment posted");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockObjectStore;
    use crate::models::{FileRef, User};
    use chrono::Utc;

    fn session() -> Session {
        Session::new(
            User {
                id: "u2".into(),
                username: "ana".into(),
                last_posted_at: None,
            },
            "tok",
        )
    }

    fn post(comments: Option<Vec<Comment>>) -> Post {
        let now = Utc::now();
        Post {
            id: "p1".into(),
            created_at: now,
            updated_at: now,
            caption: None,
            author: User {
                id: "u1".into(),
                username: "lou".into(),
                last_posted_at: Some(now),
            },
            image: FileRef {
                name: "image.jpg".into(),
                url: None,
            },
            location: None,
            comments,
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_a_remote_write() {
        let store = MockObjectStore::new();
        let comments = CommentService::new(Arc::new(store));

        let err = comments
            .add_comment(&post(None), "   ", &session())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn appending_initializes_an_absent_list() {
        let mut store = MockObjectStore::new();
        store
            .expect_update_post()
            .times(1)
            .returning(|post, _| Ok(post.clone()));

        let comments = CommentService::new(Arc::new(store));
        let saved = comments
            .add_comment(&post(None), "first!", &session())
            .await
            .unwrap();

        assert_eq!(saved.comment_list().len(), 1);
        assert_eq!(saved.comment_list()[0].username, "ana");
        assert_eq!(saved.comment_list()[0].content, "first!");
    }

    #[tokio::test]
    async fn appending_grows_the_list_by_exactly_one() {
        let mut store = MockObjectStore::new();
        store
            .expect_update_post()
            .times(1)
            .returning(|post, _| Ok(post.clone()));

        let existing = vec![Comment {
            username: "lou".into(),
            content: "day one".into(),
        }];
        let comments = CommentService::new(Arc::new(store));
        let saved = comments
            .add_comment(&post(Some(existing)), "  welcome  ", &session())
            .await
            .unwrap();

        assert_eq!(saved.comment_list().len(), 2);
        assert_eq!(saved.comment_list()[1].content, "welcome");
    }
}
