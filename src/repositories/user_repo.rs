use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{Profile, ProfileUpdate, ProviderAccount, ProviderAccountCreate, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError>;

    /// Create a user together with its paired profile row. Both rows are
    /// written in one transaction: both or neither.
    async fn create_user_with_profile(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ApiError>;

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError>;
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, ApiError>;

    async fn create_provider_account(
        &self,
        user_id: &str,
        account: &ProviderAccountCreate,
    ) -> Result<ProviderAccount, ApiError>;
    async fn list_provider_accounts(&self, user_id: &str)
        -> Result<Vec<ProviderAccount>, ApiError>;
}

pub struct SqlxUserRepository {
    pool: DatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user_with_profile(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ApiError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, username, full_name, avatar_url, created_at, updated_at
            FROM profiles WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, ApiError> {
        let Some(mut profile) = self.find_profile(user_id).await? else {
            return Ok(None);
        };

        if let Some(username) = &update.username {
            profile.username = Some(username.clone());
        }
        if let Some(full_name) = &update.full_name {
            profile.full_name = Some(full_name.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        profile.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE profiles
            SET username = ?, full_name = ?, avatar_url = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.full_name)
        .bind(&profile.avatar_url)
        .bind(profile.updated_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(Some(profile))
    }

    async fn create_provider_account(
        &self,
        user_id: &str,
        account: &ProviderAccountCreate,
    ) -> Result<ProviderAccount, ApiError> {
        let now = Utc::now();
        let record = ProviderAccount {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            provider: account.provider.clone(),
            provider_account_id: account.provider_account_id.clone(),
            access_token: account.access_token.clone(),
            refresh_token: account.refresh_token.clone(),
            scope: account.scope.clone(),
            expires_at: account.expires_at,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO provider_accounts
                (id, user_id, provider, provider_account_id, access_token,
                 refresh_token, scope, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.provider)
        .bind(&record.provider_account_id)
        .bind(&record.access_token)
        .bind(&record.refresh_token)
        .bind(&record.scope)
        .bind(record.expires_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_provider_accounts(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProviderAccount>, ApiError> {
        let accounts = sqlx::query_as::<_, ProviderAccount>(
            r#"
            SELECT id, user_id, provider, provider_account_id, access_token,
                   refresh_token, scope, expires_at, created_at, updated_at
            FROM provider_accounts
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}
