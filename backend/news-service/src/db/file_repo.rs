use crate::models::File;
use portal_common::StorageError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

type Result<T> = std::result::Result<T, StorageError>;

/// Insert freshly uploaded files as active
pub async fn insert_files(tx: &mut Transaction<'_, Postgres>, files: &[&File]) -> Result<()> {
    for file in files {
        sqlx::query(
            r#"
            INSERT INTO files (id, bucket_name, file_name, mime_type, state)
            VALUES ($1, $2, $3, $4, 'active')
            "#,
        )
        .bind(file.id)
        .bind(&file.bucket_name)
        .bind(&file.file_name)
        .bind(&file.mime_type)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Record objects that exist in the store but belong to no news item.
///
/// Used when an upload could not be attached and its synchronous removal
/// failed; the cleanup worker picks them up.
pub async fn insert_orphans(pool: &PgPool, files: &[&File]) -> Result<()> {
    for file in files {
        sqlx::query(
            r#"
            INSERT INTO files (id, bucket_name, file_name, mime_type, state, deleted_at)
            VALUES ($1, $2, $3, $4, 'pending_delete', NOW())
            ON CONFLICT (id) DO UPDATE
                SET state = 'pending_delete', deleted_at = NOW()
                WHERE files.state = 'active'
            "#,
        )
        .bind(file.id)
        .bind(&file.bucket_name)
        .bind(&file.file_name)
        .bind(&file.mime_type)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Detach files from their news item. Only active files move.
pub async fn mark_pending_delete(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        UPDATE files
        SET state = 'pending_delete', deleted_at = NOW()
        WHERE id = ANY($1) AND state = 'active'
        "#,
    )
    .bind(ids)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<File>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let files = sqlx::query_as::<_, File>(
        r#"
        SELECT id, bucket_name, file_name, mime_type, state
        FROM files
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(files)
}

pub async fn find_active(pool: &PgPool, id: Uuid) -> Result<Option<File>> {
    let file = sqlx::query_as::<_, File>(
        r#"
        SELECT id, bucket_name, file_name, mime_type, state
        FROM files
        WHERE id = $1 AND state = 'active'
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(file)
}

/// Oldest files waiting for removal from the store, leaving out `skip`
pub async fn find_pending_delete(pool: &PgPool, skip: &[Uuid], limit: i64) -> Result<Vec<File>> {
    let files = sqlx::query_as::<_, File>(
        r#"
        SELECT id, bucket_name, file_name, mime_type, state
        FROM files
        WHERE state = 'pending_delete' AND id <> ALL($1)
        ORDER BY deleted_at, id
        LIMIT $2
        "#,
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(files)
}

/// Flag files whose objects were removed. Files that left
/// `pending_delete` in the meantime are untouched.
pub async fn mark_hard_deleted(pool: &PgPool, ids: &[Uuid]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        UPDATE files
        SET state = 'hard_deleted', hard_deleted_at = NOW()
        WHERE id = ANY($1) AND state = 'pending_delete'
        "#,
    )
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
