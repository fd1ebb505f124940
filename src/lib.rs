/// Dayframe Client Core
///
/// The application core of a social photo-sharing client built around a
/// 24-hour feed: users log in, browse posts from the last day, publish a
/// photo with an optional caption and geotag, and comment on other posts.
/// Persistence, querying, authentication, and file storage are delegated to
/// a remote object store behind the [`gateway::ObjectStore`] trait; this
/// crate owns the flows between them.
///
/// # Modules
///
/// - `models`: Data entities (posts, comments, users)
/// - `gateway`: Object-store abstraction plus REST and in-memory backends
/// - `services`: Feed retrieval, post composition, comment append, auth
/// - `view`: Post-to-display-row mapping with cancellable async loads
/// - `events`: Broadcast channel for login/logout/post-published signals
/// - `session`: Explicitly passed authenticated identity
/// - `media`: Image re-encoding before upload
/// - `location`: Location provider trait and best-effort reverse geocoding
/// - `notify`: Post-reminder scheduling
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod location;
pub mod media;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;
pub mod telemetry;
pub mod view;

pub use config::Config;
pub use error::{AppError, Result};
pub use events::{AppEvent, EventBus};
pub use session::Session;
