//! Multipart form used to create and edit news
//!
//! Parts: `newsFile` (required file), `previewFile` (optional file) and
//! `newsAttr` (required JSON `NewsInput`). Unknown parts are drained.

use crate::error::{NewsError, Result};
use crate::models::{NewsInput, Upload};
use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures_util::stream::StreamExt;

pub const NEWS_FILE_KEY: &str = "newsFile";
pub const PREVIEW_FILE_KEY: &str = "previewFile";
pub const NEWS_ATTR_KEY: &str = "newsAttr";

/// Largest accepted file part
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const MAX_ATTR_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub struct NewsForm {
    pub attributes: NewsInput,
    pub content: Upload,
    pub preview: Option<Upload>,
}

pub async fn read_news_form(mut payload: Multipart) -> Result<NewsForm> {
    let mut attributes = None;
    let mut content = None;
    let mut preview = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| NewsError::Validation(format!("malformed multipart body: {}", e)))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            NEWS_FILE_KEY => content = read_upload(&mut field).await?,
            PREVIEW_FILE_KEY => preview = read_upload(&mut field).await?,
            NEWS_ATTR_KEY => {
                let raw = read_field(&mut field, NEWS_ATTR_KEY, MAX_ATTR_BYTES).await?;
                let parsed: NewsInput = serde_json::from_slice(&raw).map_err(|e| {
                    NewsError::Validation(format!("invalid {}: {}", NEWS_ATTR_KEY, e))
                })?;
                attributes = Some(parsed);
            }
            other => {
                tracing::debug!(part = other, "Ignoring unknown multipart part");
                read_field(&mut field, other, MAX_UPLOAD_BYTES).await?;
            }
        }
    }

    let content = content
        .ok_or_else(|| NewsError::Validation(format!("{} is required", NEWS_FILE_KEY)))?;
    let attributes = attributes
        .ok_or_else(|| NewsError::Validation(format!("{} is required", NEWS_ATTR_KEY)))?;

    Ok(NewsForm {
        attributes,
        content,
        preview,
    })
}

/// A file part; an empty part with no filename counts as absent.
async fn read_upload(field: &mut Field) -> Result<Option<Upload>> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let content_type = field.content_type().map(|m| m.essence_str().to_string());
    let name = field.name().unwrap_or_default().to_string();

    let data = read_field(field, &name, MAX_UPLOAD_BYTES).await?;
    if filename.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(Upload {
        filename,
        content_type,
        data,
    }))
}

async fn read_field(field: &mut Field, name: &str, limit: usize) -> Result<Bytes> {
    let mut buf = BytesMut::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| NewsError::Validation(format!("failed to read {}: {}", name, e)))?;
        if buf.len() + chunk.len() > limit {
            return Err(NewsError::PayloadTooLarge(format!(
                "{} exceeds {} bytes",
                name, limit
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}
