use crate::models::NewsInput;
use chrono::{DateTime, Utc};
use portal_common::StorageError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

type Result<T> = std::result::Result<T, StorageError>;

/// A news row with file and user references still unresolved
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub state: String,
    pub author: Uuid,
    pub content_id: Uuid,
    pub preview_id: Option<Uuid>,
    pub user_created: Uuid,
    pub user_updated: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsRow {
    pub fn file_ids(&self) -> impl Iterator<Item = Uuid> {
        std::iter::once(self.content_id).chain(self.preview_id)
    }
}

/// Files attached to a news item
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct AttachedFiles {
    pub content_id: Uuid,
    pub preview_id: Option<Uuid>,
}

impl AttachedFiles {
    pub fn ids(&self) -> Vec<Uuid> {
        std::iter::once(self.content_id).chain(self.preview_id).collect()
    }
}

pub async fn insert_news(
    tx: &mut Transaction<'_, Postgres>,
    input: &NewsInput,
    author: Uuid,
    files: AttachedFiles,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO news (title, description, state, author, content_id, preview_id,
                          user_created, user_updated)
        VALUES ($1, $2, $3, $4, $5, $6, $4, $4)
        RETURNING id
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.state)
    .bind(author)
    .bind(files.content_id)
    .bind(files.preview_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

/// Lock a live news row for an edit and return its current files
pub async fn lock_files(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<AttachedFiles>> {
    let files = sqlx::query_as::<_, AttachedFiles>(
        r#"
        SELECT content_id, preview_id
        FROM news
        WHERE id = $1 AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(files)
}

pub async fn update_news(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &NewsInput,
    editor: Uuid,
    files: AttachedFiles,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE news
        SET title = $2,
            description = $3,
            state = $4,
            content_id = $5,
            preview_id = $6,
            user_updated = $7,
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.state)
    .bind(files.content_id)
    .bind(files.preview_id)
    .bind(editor)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

/// Soft delete; returns the files the row pointed at
pub async fn soft_delete(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<AttachedFiles>> {
    let files = sqlx::query_as::<_, AttachedFiles>(
        r#"
        UPDATE news
        SET deleted_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING content_id, preview_id
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(files)
}

/// Live news, oldest first
pub async fn find_page(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<NewsRow>> {
    let rows = sqlx::query_as::<_, NewsRow>(
        r#"
        SELECT id, title, description, state, author, content_id, preview_id,
               user_created, user_updated, created_at, updated_at
        FROM news
        WHERE deleted_at IS NULL
        ORDER BY created_at, id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<NewsRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, NewsRow>(
        r#"
        SELECT id, title, description, state, author, content_id, preview_id,
               user_created, user_updated, created_at, updated_at
        FROM news
        WHERE id = ANY($1) AND deleted_at IS NULL
        ORDER BY created_at, id
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn is_live(pool: &PgPool, id: Uuid) -> Result<bool> {
    let live: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM news WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(live)
}
