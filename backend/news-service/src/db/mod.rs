/// Database access for news-service
///
/// Functions return `StorageError` so the service layer decides how a
/// missing row or a constraint violation surfaces to callers. Writes that
/// must commit together take a `Transaction`.
pub mod comment_repo;
pub mod file_repo;
pub mod like_repo;
pub mod news_repo;
