use chrono::{DateTime, Utc};
use portal_common::Profile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const MAX_COMMENT_CHARS: u64 = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub liker: Profile,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: Profile,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = MAX_COMMENT_CHARS, message = "content must be 1 to 4096 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentEdit {
    pub id: Uuid,
    #[validate(length(min = 1, max = MAX_COMMENT_CHARS, message = "content must be 1 to 4096 characters"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_length_counts_characters() {
        let max = CommentInput {
            content: "ж".repeat(MAX_COMMENT_CHARS as usize),
        };
        assert!(max.validate().is_ok());

        let over = CommentInput {
            content: "a".repeat(MAX_COMMENT_CHARS as usize + 1),
        };
        assert!(over.validate().is_err());

        let empty = CommentInput { content: String::new() };
        assert!(empty.validate().is_err());
    }
}
