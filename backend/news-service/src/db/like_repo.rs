use chrono::{DateTime, Utc};
use portal_common::StorageError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub liker: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn find_active_by_news(pool: &PgPool, news_id: Uuid) -> Result<Vec<LikeRow>> {
    let likes = sqlx::query_as::<_, LikeRow>(
        r#"
        SELECT id, liker, created_at, updated_at
        FROM likes
        WHERE news_id = $1 AND is_active = TRUE
        ORDER BY created_at
        "#,
    )
    .bind(news_id)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

pub async fn has_active(
    tx: &mut Transaction<'_, Postgres>,
    news_id: Uuid,
    liker: Uuid,
) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM likes
            WHERE news_id = $1 AND liker = $2 AND is_active = TRUE
        )
        "#,
    )
    .bind(news_id)
    .bind(liker)
    .fetch_one(&mut **tx)
    .await?;

    Ok(exists)
}

/// Insert an active like. A concurrent duplicate hits the partial unique
/// index and comes back as `StorageError::Duplicate`.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    news_id: Uuid,
    liker: Uuid,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO likes (news_id, liker)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(news_id)
    .bind(liker)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

/// Withdraw the active like, if any
pub async fn deactivate(pool: &PgPool, news_id: Uuid, liker: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE likes
        SET is_active = FALSE, updated_at = NOW()
        WHERE news_id = $1 AND liker = $2 AND is_active = TRUE
        "#,
    )
    .bind(news_id)
    .bind(liker)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
