/// REST implementation of the object-store gateway
///
/// Speaks the hosted store's REST dialect: class objects under
/// `/classes/Post`, accounts under `/users`, blob uploads under `/files`,
/// and `login`/`logout` endpoints. Requests are keyed by application-id and
/// REST-key headers; authenticated writes additionally carry the session
/// token. Typed wire structs keep the protocol's `__type`-tagged values out
/// of the domain models.
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Comment, FileRef, GeoPoint, Post, User};
use crate::session::Session;

use super::{FeedQuery, NewPostRecord, ObjectStore};

const POST_CLASS_PATH: &str = "classes/Post";
const FEED_INCLUDES: &str = "author,comments";

pub struct RestGateway {
    http: reqwest::Client,
    server_url: String,
    application_id: String,
    rest_key: String,
}

impl RestGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: config.server_url.trim_end_matches('/').to_string(),
            application_id: config.application_id.clone(),
            rest_key: config.rest_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.server_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("X-Parse-Application-Id", &self.application_id)
            .header("X-Parse-REST-API-Key", &self.rest_key)
    }

    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.request(method, path)
            .header("X-Parse-Session-Token", &session.token)
    }
}

/// Resolve a non-2xx response into the error surfaced to the user, keeping
/// the backend's own description when it sends one.
async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let description = resp
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    tracing::warn!(%status, "object store request failed: {description}");

    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(description),
        StatusCode::NOT_FOUND => AppError::NotFound(description),
        _ => AppError::Remote(description),
    })
}

#[async_trait]
impl ObjectStore for RestGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let resp = self
            .request(reqwest::Method::GET, "login")
            .header("X-Parse-Revocable-Session", "1")
            .query(&[("username", username), ("password", password)])
            .send()
            .await?;

        let wire: LoginResponse = expect_success(resp).await?.json().await?;
        let token = wire.session_token.clone();
        Ok(Session::new(wire.user.into_user()?, token))
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        let resp = self
            .authed(reqwest::Method::POST, "logout", session)
            .send()
            .await?;
        expect_success(resp).await?;
        Ok(())
    }

    async fn upload_image(&self, name: &str, bytes: Vec<u8>) -> Result<FileRef> {
        let resp = self
            .request(reqwest::Method::POST, &format!("files/{name}"))
            .header("Content-Type", "image/jpeg")
            .body(bytes)
            .send()
            .await?;

        let wire: FileUploadResponse = expect_success(resp).await?.json().await?;
        Ok(FileRef {
            name: wire.name,
            url: Some(wire.url),
        })
    }

    async fn create_post(&self, record: &NewPostRecord, session: &Session) -> Result<Post> {
        let body = PostBody {
            caption: record.caption.clone(),
            author: PointerWire::user(&record.author_id),
            image: FileWire::from_ref(&record.image),
            location: record.location.map(GeoPointWire::from_point),
            comments: None,
        };

        let resp = self
            .authed(reqwest::Method::POST, POST_CLASS_PATH, session)
            .json(&body)
            .send()
            .await?;
        let created: CreatedResponse = expect_success(resp).await?.json().await?;

        Ok(Post {
            id: created.object_id,
            created_at: created.created_at,
            updated_at: created.created_at,
            caption: record.caption.clone(),
            author: session.user.clone(),
            image: record.image.clone(),
            location: record.location,
            comments: None,
        })
    }

    async fn update_post(&self, post: &Post, session: &Session) -> Result<Post> {
        // Whole-object overwrite: the stored record, comment list included,
        // is replaced with this one. Last writer wins.
        let body = PostBody {
            caption: post.caption.clone(),
            author: PointerWire::user(&post.author.id),
            image: FileWire::from_ref(&post.image),
            location: post.location.map(GeoPointWire::from_point),
            comments: Some(
                post.comment_list()
                    .iter()
                    .map(CommentBody::from_comment)
                    .collect(),
            ),
        };

        let path = format!("{POST_CLASS_PATH}/{}", post.id);
        let resp = self
            .authed(reqwest::Method::PUT, &path, session)
            .json(&body)
            .send()
            .await?;
        let updated: UpdatedResponse = expect_success(resp).await?.json().await?;

        let mut saved = post.clone();
        saved.updated_at = updated.updated_at;
        Ok(saved)
    }

    async fn update_last_posted(
        &self,
        user: &User,
        at: DateTime<Utc>,
        session: &Session,
    ) -> Result<User> {
        let body = LastPostedBody {
            last_posted_at: DateWire::from_datetime(at),
        };

        let path = format!("users/{}", user.id);
        let resp = self
            .authed(reqwest::Method::PUT, &path, session)
            .json(&body)
            .send()
            .await?;
        expect_success(resp).await?;

        let mut saved = user.clone();
        saved.last_posted_at = Some(at);
        Ok(saved)
    }

    async fn find_posts(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        let resp = self
            .request(reqwest::Method::GET, POST_CLASS_PATH)
            .query(&feed_query_params(query))
            .send()
            .await?;

        let wire: QueryResults<PostWire> = expect_success(resp).await?.json().await?;
        wire.results.into_iter().map(PostWire::into_post).collect()
    }
}

/// `where` filter selecting posts created at or after the cutoff.
fn feed_where_clause(cutoff: DateTime<Utc>) -> String {
    serde_json::json!({
        "createdAt": { "$gte": DateWire::from_datetime(cutoff) }
    })
    .to_string()
}

/// Query-string parameters for the feed: window filter, newest-first order,
/// page limit, and eager includes so authors and comments arrive in the
/// same round trip.
fn feed_query_params(query: &FeedQuery) -> [(&'static str, String); 4] {
    [
        ("where", feed_where_clause(query.cutoff)),
        ("order", "-createdAt".to_string()),
        ("limit", query.limit.to_string()),
        ("include", FEED_INCLUDES.to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct DateWire {
    #[serde(rename = "__type")]
    kind: String,
    iso: String,
}

impl DateWire {
    fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            kind: "Date".to_string(),
            iso: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn into_datetime(self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.iso)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|err| AppError::Decode(format!("bad date '{}': {err}", self.iso)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileWire {
    #[serde(rename = "__type")]
    kind: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl FileWire {
    fn from_ref(file: &FileRef) -> Self {
        Self {
            kind: "File".to_string(),
            name: file.name.clone(),
            url: file.url.clone(),
        }
    }

    fn into_ref(self) -> FileRef {
        FileRef {
            name: self.name,
            url: self.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeoPointWire {
    #[serde(rename = "__type")]
    kind: String,
    latitude: f64,
    longitude: f64,
}

impl GeoPointWire {
    fn from_point(point: GeoPoint) -> Self {
        Self {
            kind: "GeoPoint".to_string(),
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }

    fn into_point(self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Serialize)]
struct PointerWire {
    #[serde(rename = "__type")]
    kind: &'static str,
    #[serde(rename = "className")]
    class_name: &'static str,
    #[serde(rename = "objectId")]
    object_id: String,
}

impl PointerWire {
    fn user(object_id: &str) -> Self {
        Self {
            kind: "Pointer",
            class_name: "_User",
            object_id: object_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    author: PointerWire,
    image: FileWire,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<GeoPointWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<CommentBody>>,
}

#[derive(Debug, Serialize)]
struct CommentBody {
    username: String,
    content: String,
}

impl CommentBody {
    fn from_comment(comment: &Comment) -> Self {
        Self {
            username: comment.username.clone(),
            content: comment.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LastPostedBody {
    last_posted_at: DateWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    object_id: String,
    username: String,
    last_posted_at: Option<DateWire>,
}

impl UserWire {
    fn into_user(self) -> Result<User> {
        let last_posted_at = self
            .last_posted_at
            .map(DateWire::into_datetime)
            .transpose()?;
        Ok(User {
            id: self.object_id,
            username: self.username,
            last_posted_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    session_token: String,
    #[serde(flatten)]
    user: UserWire,
}

#[derive(Debug, Deserialize)]
struct CommentWire {
    username: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostWire {
    object_id: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    caption: Option<String>,
    author: Option<UserWire>,
    image: Option<FileWire>,
    location: Option<GeoPointWire>,
    comments: Option<Vec<CommentWire>>,
}

impl PostWire {
    fn into_post(self) -> Result<Post> {
        let author = self
            .author
            .ok_or_else(|| AppError::Decode(format!("post {} is missing its author", self.object_id)))?
            .into_user()?;
        let image = self
            .image
            .ok_or_else(|| AppError::Decode(format!("post {} is missing its image", self.object_id)))?
            .into_ref();

        Ok(Post {
            id: self.object_id,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            caption: self.caption,
            author,
            image,
            location: self.location.map(GeoPointWire::into_point),
            comments: self.comments.map(|list| {
                list.into_iter()
                    .map(|c| Comment {
                        username: c.username.unwrap_or_default(),
                        content: c.content.unwrap_or_default(),
                    })
                    .collect()
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedResponse {
    object_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedResponse {
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct FileUploadResponse {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct QueryResults<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}
