/// Post display rows
///
/// One row per post: author name, caption, formatted creation date, the
/// inline comment list, and a comment-composer flag that is disabled when
/// the viewer has already posted inside the tracked window. The image and
/// the geocoded place name arrive asynchronously into cancellable slots;
/// `prepare_for_reuse` must be called before a recycled row is given new
/// content.
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::location::ReverseGeocoder;
use crate::models::{Comment, GeoPoint, Post};

use super::slot::AsyncSlot;

/// Full-style date shown under each post, e.g. "Friday, September 6, 2024".
pub fn format_post_date(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

pub struct PostRow {
    pub username: String,
    pub caption: Option<String>,
    pub posted_on: String,
    pub comments: Vec<Comment>,
    pub comment_box_enabled: bool,
    image_url: Option<String>,
    location: Option<GeoPoint>,
    image: AsyncSlot<Vec<u8>>,
    place_name: AsyncSlot<String>,
}

impl PostRow {
    pub fn from_post(post: &Post, viewer_has_posted: bool) -> Self {
        Self {
            username: post.author.username.clone(),
            caption: post.caption.clone(),
            posted_on: format_post_date(post.created_at),
            comments: post.comment_list().to_vec(),
            comment_box_enabled: !viewer_has_posted,
            image_url: post.image.url.clone(),
            location: post.location,
            image: AsyncSlot::new(),
            place_name: AsyncSlot::new(),
        }
    }

    /// Kick off the row's asynchronous loads. Image fetch failures and
    /// geocoding failures are logged and leave the slot empty.
    pub fn start_loads(&mut self, http: reqwest::Client, geocoder: Arc<ReverseGeocoder>) {
        if let Some(url) = self.image_url.clone() {
            self.image.assign(async move {
                match fetch_image(http, &url).await {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        tracing::debug!(%url, "image load failed: {err}");
                        None
                    }
                }
            });
        }

        if let Some(point) = self.location {
            self.place_name
                .assign(async move { geocoder.place_name(point).await });
        }
    }

    /// Cancel in-flight loads and clear loaded content before the row is
    /// re-bound to another post.
    pub fn prepare_for_reuse(&mut self) {
        self.image.reset();
        self.place_name.reset();
    }

    pub fn image(&self) -> Option<Vec<u8>> {
        self.image.get()
    }

    pub fn place_name(&self) -> Option<String> {
        self.place_name.get()
    }
}

async fn fetch_image(http: reqwest::Client, url: &str) -> crate::Result<Vec<u8>> {
    let bytes = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}
