/// Background jobs for news-service
pub mod file_cleaner;

pub use file_cleaner::start_file_cleaner;
