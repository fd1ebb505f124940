/// Business logic layer
///
/// Thin flows over the gateway: each service owns one user-visible
/// operation and nothing else talks to the store directly.
pub mod auth;
pub mod comments;
pub mod composer;
pub mod feed;

pub use auth::AuthService;
pub use comments::CommentService;
pub use composer::{PostComposer, PostDraft};
pub use feed::FeedService;
