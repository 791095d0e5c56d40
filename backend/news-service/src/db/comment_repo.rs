use chrono::{DateTime, Utc};
use portal_common::StorageError;
use sqlx::PgPool;
use uuid::Uuid;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn insert(pool: &PgPool, news_id: Uuid, author: Uuid, content: &str) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO comments (news_id, author, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(news_id)
    .bind(author)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Author of a live comment under `news_id`
pub async fn find_author(pool: &PgPool, news_id: Uuid, comment_id: Uuid) -> Result<Option<Uuid>> {
    let author: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT author
        FROM comments
        WHERE id = $1 AND news_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(comment_id)
    .bind(news_id)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

pub async fn update_content(
    pool: &PgPool,
    comment_id: Uuid,
    author: Uuid,
    content: &str,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET content = $3, updated_at = NOW()
        WHERE id = $1 AND author = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(comment_id)
    .bind(author)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn soft_delete(pool: &PgPool, comment_id: Uuid, author: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET deleted_at = NOW()
        WHERE id = $1 AND author = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(comment_id)
    .bind(author)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_news(pool: &PgPool, news_id: Uuid) -> Result<Vec<CommentRow>> {
    let comments = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, author, content, created_at, updated_at
        FROM comments
        WHERE news_id = $1 AND deleted_at IS NULL
        ORDER BY created_at
        "#,
    )
    .bind(news_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
