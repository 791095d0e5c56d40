use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Bucket holding news bodies
pub const CONTENT_BUCKET: &str = "news";

/// Bucket holding preview images
pub const PREVIEW_BUCKET: &str = "newspreviewimg";

/// Lifecycle of a stored blob.
///
/// `HardDeleted` is written only by the cleanup worker once the object is
/// gone from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    #[default]
    #[sqlx(rename = "active")]
    Active,
    #[sqlx(rename = "pending_delete")]
    PendingDelete,
    #[sqlx(rename = "hard_deleted")]
    HardDeleted,
}

impl FileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PendingDelete => "pending_delete",
            Self::HardDeleted => "hard_deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct File {
    pub id: Uuid,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "bucketName")]
    pub bucket_name: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(skip)]
    pub state: FileState,
}

impl File {
    pub fn is_active(&self) -> bool {
        self.state == FileState::Active
    }
}

/// A file as received from a multipart form, before upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Object key for an upload: the file id plus the original extension,
/// lower-cased. No extension in the filename means none in the key.
pub fn object_name(id: Uuid, filename: &str) -> String {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", id, ext.to_lowercase()),
        _ => id.to_string(),
    }
}
