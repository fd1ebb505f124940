/// Post composition service
///
/// Publishing is two dependent remote writes: persist the post, then
/// overwrite the author's last-posted timestamp. If the second write fails
/// the post already exists remotely and no compensating rollback is
/// attempted; the error is surfaced and the inconsistency window is an
/// accepted gap. `PostPublished` is emitted exactly once, strictly after
/// both writes succeed.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::events::{AppEvent, EventBus};
use crate::gateway::{NewPostRecord, ObjectStore};
use crate::media;
use crate::models::{GeoPoint, Post};
use crate::session::Session;

/// User input for a new post. Only the image is required.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub image: Vec<u8>,
    pub caption: Option<String>,
    pub location: Option<GeoPoint>,
}

pub struct PostComposer {
    store: Arc<dyn ObjectStore>,
    events: EventBus,
    jpeg_quality: u8,
}

impl PostComposer {
    pub fn new(store: Arc<dyn ObjectStore>, events: EventBus) -> Self {
        Self {
            store,
            events,
            jpeg_quality: media::UPLOAD_JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Validate, upload, and persist `draft` as a post by the session user,
    /// then record the author's last-posted timestamp. On success the
    /// session user is refreshed with the updated timestamp.
    pub async fn publish(&self, draft: PostDraft, session: &mut Session) -> Result<Post> {
        if draft.image.is_empty() {
            return Err(AppError::Validation("a photo is required".into()));
        }

        let caption = draft
            .caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let encoded = media::encode_jpeg(&draft.image, self.jpeg_quality)?;
        let image = self
            .store
            .upload_image(media::UPLOAD_FILE_NAME, encoded)
            .await?;

        let record = NewPostRecord {
            caption,
            image,
            location: draft.location,
            author_id: session.user.id.clone(),
        };
        let post = self.store.create_post(&record, session).await?;
        tracing::info!(post_id = %post.id, "post saved");

        // Dependent write: the post already exists remotely if this fails.
        let user = self
            .store
            .update_last_posted(&session.user, post.created_at, session)
            .await?;
        session.user = user;

        self.events.emit(AppEvent::PostPublished);
        Ok(post)
    }
}
