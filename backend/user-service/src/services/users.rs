use super::UserService;
use crate::db::users as user_db;
use crate::error::{Result, UserError};
use portal_common::{normalize_roles, Profile, UserData};
use uuid::Uuid;
use validator::Validate;

impl UserService {
    /// Batch lookup. Unknown ids are omitted; an empty input skips the database.
    pub async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(user_db::find_profiles(&self.pool, user_ids).await?)
    }

    /// Admin account creation; requested roles are honored.
    pub async fn create_user(&self, data: UserData) -> Result<Uuid> {
        data.validate()?;

        let requested = data
            .profile
            .as_ref()
            .map(|p| p.roles.clone())
            .unwrap_or_default();
        let user_id = self
            .create_account(&data, normalize_roles(&requested))
            .await?;

        tracing::info!(user_id = %user_id, "User created by admin");
        Ok(user_id)
    }

    /// Admin profile edit with PATCH semantics.
    ///
    /// Only the fields present in the body change: an empty name field or a
    /// missing `avatar` keeps the stored value, and a non-empty `roles` list
    /// replaces the grants. Fields can't be cleared through this call.
    pub async fn edit_user(&self, profile: Profile) -> Result<()> {
        if profile.id.is_nil() {
            return Err(UserError::Validation("userID is required".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        user_db::update_profile(&mut tx, &profile).await?;

        if !profile.roles.is_empty() {
            let roles = normalize_roles(&profile.roles);
            let unknown = user_db::unknown_roles(&mut tx, &roles).await?;
            if let Some(role) = unknown.into_iter().next() {
                return Err(UserError::UnknownRole(role));
            }
            user_db::replace_roles(&mut tx, profile.id, &roles).await?;
        }

        tx.commit().await?;
        tracing::info!(user_id = %profile.id, "User edited by admin");
        Ok(())
    }

    /// Soft delete accounts. Already deleted or unknown ids are skipped.
    pub async fn delete_users(&self, user_ids: &[Uuid]) -> Result<u64> {
        if user_ids.is_empty() {
            return Err(UserError::Validation("no user ids given".to_string()));
        }

        let deleted = user_db::soft_delete(&self.pool, user_ids).await?;
        tracing::info!(requested = user_ids.len(), deleted, "Users deleted by admin");
        Ok(deleted)
    }
}
