use super::UserService;
use crate::db::users as user_db;
use crate::error::{Result, UserError};
use crate::metrics;
use crate::security::{hash_password, verify_dummy, verify_password};
use portal_common::{normalize_roles, Profile, UserData};
use uuid::Uuid;
use validator::Validate;

impl UserService {
    /// Register a new account.
    ///
    /// The profile username defaults to the login. Self-registered accounts
    /// only receive the default role; requested roles are ignored here.
    pub async fn sign_up(&self, data: UserData) -> Result<Profile> {
        let result = self.sign_up_inner(data).await;
        metrics::record_auth_attempt("signup", result.is_ok());
        result
    }

    async fn sign_up_inner(&self, data: UserData) -> Result<Profile> {
        data.validate()?;

        let no_roles: [&str; 0] = [];
        let user_id = self.create_account(&data, normalize_roles(&no_roles)).await?;
        tracing::info!(user_id = %user_id, "User signed up");

        self.profile_by_id(user_id).await
    }

    /// Check credentials and return the full profile with roles.
    ///
    /// Unknown logins and wrong passwords produce the same error.
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<Profile> {
        let result = self.sign_in_inner(login, password).await;
        metrics::record_auth_attempt("signin", result.is_ok());
        result
    }

    async fn sign_in_inner(&self, login: &str, password: &str) -> Result<Profile> {
        let Some(creds) = user_db::find_credentials(&self.pool, login).await? else {
            verify_dummy(password);
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &creds.hashed_password)? {
            return Err(UserError::InvalidCredentials);
        }

        user_db::find_profiles(&self.pool, &[creds.id])
            .await?
            .into_iter()
            .next()
            .ok_or(UserError::InvalidCredentials)
    }

    /// Insert account, profile and role grants in one transaction.
    ///
    /// `roles` must already be normalized.
    pub(crate) async fn create_account(&self, data: &UserData, roles: Vec<String>) -> Result<Uuid> {
        let hashed = hash_password(&data.password)?;

        let mut profile = data.profile.clone().unwrap_or_default();
        if profile.username.trim().is_empty() {
            profile.username = data.login.clone();
        }

        let mut tx = self.pool.begin().await?;

        let user_id = user_db::insert_login(&mut tx, &data.login, &hashed).await?;
        user_db::insert_profile(&mut tx, user_id, &profile).await?;

        let unknown = user_db::unknown_roles(&mut tx, &roles).await?;
        if let Some(role) = unknown.into_iter().next() {
            return Err(UserError::UnknownRole(role));
        }
        user_db::replace_roles(&mut tx, user_id, &roles).await?;

        tx.commit().await?;
        Ok(user_id)
    }

    pub(crate) async fn profile_by_id(&self, user_id: Uuid) -> Result<Profile> {
        user_db::find_profiles(&self.pool, &[user_id])
            .await?
            .into_iter()
            .next()
            .ok_or(UserError::UserNotFound)
    }
}
