use super::file::File;
use chrono::{DateTime, Utc};
use portal_common::Profile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Largest page the list endpoint serves
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Highest page number accepted; keeps the row offset well inside `i64`
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub state: String,
    pub content: File,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<File>,
    pub author: Profile,
    #[serde(rename = "userCreated")]
    pub user_created: Profile,
    #[serde(rename = "userUpdated")]
    pub user_updated: Profile,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Writer-supplied attributes, sent as the `newsAttr` multipart part
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewsInput {
    #[validate(length(min = 1, max = 512, message = "title must be 1 to 512 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 64, message = "state must be at most 64 characters"))]
    pub state: String,
}

/// Pagination for the news list. `page` counts from 1.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct Page {
    #[validate(range(min = 1, max = MAX_PAGE_LIMIT, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[validate(range(min = 1, max = MAX_PAGE, message = "page must be between 1 and 1000000"))]
    pub page: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}
