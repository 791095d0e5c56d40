/// S3 operations behind the `ObjectStore` trait
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;

use crate::config::DEFAULT_REGION;
use crate::{ObjectStore, S3Client, S3Error};

const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME type for an uploaded blob.
///
/// The file extension wins; the content type declared by the uploader is
/// used when the extension is unknown, and `application/octet-stream` last.
pub fn detect_mime(filename: &str, declared: Option<&str>) -> String {
    if let Some(guess) = mime_guess::from_path(filename).first() {
        return guess.essence_str().to_string();
    }

    declared
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), S3Error> {
        let size = data.len();
        self.client()
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| S3Error::Request(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket, key, size, content_type, "Object uploaded");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, S3Error> {
        let response = self
            .client()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    S3Error::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    S3Error::Request(DisplayErrorContext(&service_err).to_string())
                }
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| S3Error::Body(e.to_string()))?;
        Ok(body.into_bytes())
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<(), S3Error> {
        self.client()
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3Error::Request(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket, key, "Object removed");
        Ok(())
    }

    async fn ping(&self) -> Result<(), S3Error> {
        self.client()
            .list_buckets()
            .send()
            .await
            .map_err(|e| S3Error::Request(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        if self.client().head_bucket().bucket(bucket).send().await.is_ok() {
            return Ok(());
        }

        let mut request = self.client().create_bucket().bucket(bucket);
        if self.config().region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        self.config().region.as_str(),
                    ))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                tracing::info!(bucket, "Bucket created");
                Ok(())
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_bucket_already_owned_by_you()
                    || service_err.is_bucket_already_exists()
                {
                    Ok(())
                } else {
                    Err(S3Error::Request(
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_decides_mime() {
        assert_eq!(detect_mime("photo.JPG", Some("text/plain")), "image/jpeg");
        assert_eq!(detect_mime("article.html", None), "text/html");
        assert_eq!(detect_mime("notes.txt", None), "text/plain");
    }

    #[test]
    fn test_declared_type_used_for_unknown_extension() {
        assert_eq!(
            detect_mime("blob.unknownext", Some("application/pdf")),
            "application/pdf"
        );
        assert_eq!(detect_mime("noextension", Some("image/png")), "image/png");
    }

    #[test]
    fn test_fallback_mime() {
        assert_eq!(detect_mime("noextension", None), FALLBACK_MIME);
        assert_eq!(detect_mime("noextension", Some("  ")), FALLBACK_MIME);
    }
}
