/// Business logic for news-service
///
/// `NewsService` owns the news, file, like and comment flows. Reads finish
/// with one enrichment pass (`hydrate::enrich`) against the user directory.
mod activities;
pub mod directory;
pub mod hydrate;
mod news;

pub use directory::UserDirectory;

use s3_utils::ObjectStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct NewsService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    users: Arc<dyn UserDirectory>,
}

impl NewsService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { pool, store, users }
    }
}
