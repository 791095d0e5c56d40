/// Data models for news-service
///
/// - `News`: an article with its content file and optional preview image
/// - `File`: a blob in object storage and its lifecycle state
/// - `Like`, `Comment`: reader activity on a news item
///
/// User fields hold bare `Profile` references until `services::hydrate`
/// replaces them with directory entries.
mod activity;
mod file;
mod news;

pub use activity::{Comment, CommentEdit, CommentInput, Like, MAX_COMMENT_CHARS};
pub use file::{object_name, File, FileState, Upload, CONTENT_BUCKET, PREVIEW_BUCKET};
pub use news::{News, NewsInput, Page, MAX_PAGE, MAX_PAGE_LIMIT};
