/// User database operations for user-service
///
/// Accounts live in `users`, public data in `profile`, grants in
/// `user_roles`. Every read skips soft-deleted rows.
use portal_common::{Profile, StorageError};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

type Result<T> = std::result::Result<T, StorageError>;

/// Login lookup result used by signin
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: Uuid,
    pub hashed_password: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    sur_name: String,
    avatar_id: Option<Uuid>,
    roles: Vec<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.user_id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            sur_name: row.sur_name,
            avatar_id: row.avatar_id,
            roles: row.roles,
        }
    }
}

/// Insert the account row and return its id
pub async fn insert_login(
    tx: &mut Transaction<'_, Postgres>,
    login: &str,
    hashed_password: &str,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (login, hashed_password)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(login)
    .bind(hashed_password)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

pub async fn insert_profile(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    profile: &Profile,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profile (user_id, username, first_name, last_name, sur_name, avatar_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(&profile.username)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.sur_name)
    .bind(profile.avatar_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Requested role names that have no row in `roles`
pub async fn unknown_roles(tx: &mut Transaction<'_, Postgres>, roles: &[String]) -> Result<Vec<String>> {
    let known: Vec<String> =
        sqlx::query_scalar("SELECT role_name::text FROM roles WHERE role_name = ANY($1)")
            .bind(roles)
            .fetch_all(&mut **tx)
            .await?;

    Ok(roles
        .iter()
        .filter(|r| !known.contains(r))
        .cloned()
        .collect())
}

/// Replace every grant of `user_id` with `roles`
pub async fn replace_roles(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    roles: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, r.id FROM roles r WHERE r.role_name = ANY($2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(roles)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Find credentials for a live account
pub async fn find_credentials(pool: &PgPool, login: &str) -> Result<Option<Credentials>> {
    let creds = sqlx::query_as::<_, Credentials>(
        "SELECT id, hashed_password FROM users WHERE login = $1 AND deleted_at IS NULL",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(creds)
}

/// Batch profile lookup with roles. Unknown or deleted ids are omitted.
pub async fn find_profiles(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT
            p.user_id,
            p.username,
            p.first_name,
            p.last_name,
            p.sur_name,
            p.avatar_id,
            COALESCE(
                array_agg(r.role_name::text ORDER BY r.id) FILTER (WHERE r.id IS NOT NULL),
                ARRAY[]::text[]
            ) AS roles
        FROM profile p
        JOIN users u ON u.id = p.user_id AND u.deleted_at IS NULL
        LEFT JOIN user_roles ur ON ur.user_id = p.user_id
        LEFT JOIN roles r ON r.id = ur.role_id
        WHERE p.user_id = ANY($1) AND p.deleted_at IS NULL
        GROUP BY p.user_id
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Partial profile update: empty strings and a missing avatar keep the
/// stored values.
///
/// Returns `NotFound` when no live profile has this id.
pub async fn update_profile(tx: &mut Transaction<'_, Postgres>, profile: &Profile) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE profile
        SET username = COALESCE(NULLIF($2, ''), username),
            first_name = COALESCE(NULLIF($3, ''), first_name),
            last_name = COALESCE(NULLIF($4, ''), last_name),
            sur_name = COALESCE(NULLIF($5, ''), sur_name),
            avatar_id = COALESCE($6, avatar_id),
            updated_at = NOW()
        WHERE user_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(profile.id)
    .bind(&profile.username)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.sur_name)
    .bind(profile.avatar_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

/// Soft delete accounts and their profiles in one transaction.
///
/// Returns the number of accounts deleted by this call.
pub async fn soft_delete(pool: &PgPool, user_ids: &[Uuid]) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        "UPDATE users SET deleted_at = NOW() WHERE id = ANY($1) AND deleted_at IS NULL",
    )
    .bind(user_ids)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        "UPDATE profile SET deleted_at = NOW() WHERE user_id = ANY($1) AND deleted_at IS NULL",
    )
    .bind(user_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(deleted)
}
