/// Shared object storage utilities for the portal services
///
/// Provides the `ObjectStore` seam, its S3 implementation, and MIME
/// detection for uploaded blobs. Objects are addressed by bucket + key.
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use bytes::Bytes;
use thiserror::Error;

pub mod config;
pub mod operations;

pub use config::S3Config;
pub use operations::detect_mime;

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("object store request failed: {0}")]
    Request(String),

    #[error("failed to read object body: {0}")]
    Body(String),
}

impl S3Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, S3Error::NotFound { .. })
    }
}

/// Blob storage used by the services.
///
/// `S3Client` is the production implementation; tests substitute in-memory
/// stores so that upload and cleanup paths can run without a live endpoint.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), S3Error>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, S3Error>;

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<(), S3Error>;

    /// Liveness check against the endpoint
    async fn ping(&self) -> Result<(), S3Error>;

    /// Create `bucket` unless it already exists
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), S3Error>;
}

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    config: S3Config,
}

impl S3Client {
    /// Build a client for an S3-compatible endpoint with static credentials.
    ///
    /// Path-style addressing is forced so MinIO-style endpoints resolve
    /// without per-bucket DNS.
    pub async fn new(config: S3Config, provider_name: &'static str) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            provider_name,
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .endpoint_url(config.endpoint_url())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            config,
        }
    }

    /// Get reference to underlying AWS S3 client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }
}
