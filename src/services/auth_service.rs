use std::sync::Arc;

use crate::{
    config::Settings,
    error::ApiError,
    models::{Profile, ProfileUpdate, User},
    repositories::UserRepository,
    utils::crypto::{hash_password, verify_password},
    utils::token::{create_access_token, verify_token},
};

pub struct AuthService {
    settings: Arc<Settings>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl AuthService {
    pub fn new(settings: Arc<Settings>, user_repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self {
            settings,
            user_repo,
        }
    }

    /// Register a new account and issue a bearer token. The user and its
    /// profile row are created atomically.
    pub async fn register(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::validation("Invalid email address"));
        }
        if password.is_empty() {
            return Err(ApiError::validation("Password must not be empty"));
        }

        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(ApiError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .user_repo
            .create_user_with_profile(email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "registered new user");

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Authenticate with email and password. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| ApiError::authentication("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::authentication("Invalid credentials"));
        }

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Resolve the user behind a bearer token. Every failure mode (bad
    /// signature, expiry, unknown subject) surfaces as the same error.
    pub async fn resolve_current_user(&self, token: &str) -> Result<User, ApiError> {
        let claims = verify_token(token, &self.settings.auth_secret)
            .map_err(|_| ApiError::authentication("Invalid token"))?;

        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::authentication("Invalid token"))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.user_repo.find_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        self.user_repo.find_by_id(id).await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError> {
        self.user_repo.find_profile(user_id).await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        self.user_repo
            .update_profile(user_id, update)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))
    }

    fn issue_token(&self, user_id: &str) -> Result<String, ApiError> {
        create_access_token(
            user_id,
            &self.settings.auth_secret,
            self.settings.auth_token_expiry_seconds,
        )
    }
}
