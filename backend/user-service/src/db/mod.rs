/// Database access layer for user-service
pub mod users;
