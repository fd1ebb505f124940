/// Presentation mapping
///
/// Maps posts to display rows for whatever list widget the embedding shell
/// renders. Rows own their asynchronous loads (image bytes, geocoded place
/// name) through cancellable slots so recycled rows never show stale
/// content.
pub mod rows;
pub mod slot;

pub use rows::{format_post_date, PostRow};
pub use slot::AsyncSlot;
