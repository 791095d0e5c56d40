//! User directory seam
//!
//! news-service only needs batch profile lookups from user-service. The
//! trait lets tests count and script those calls.

use async_trait::async_trait;
use grpc_clients::UserClient;
use portal_common::Profile;
use uuid::Uuid;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Profiles for `ids`; unknown or deleted users are absent.
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Profile>>;
}

#[async_trait]
impl UserDirectory for UserClient {
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Profile>> {
        self.get_users_by_ids(ids).await
    }
}
