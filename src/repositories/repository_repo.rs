use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{Repository, RepositoryCreate},
};

const REPOSITORY_COLUMNS: &str = r#"
    id, user_id, external_id, name, full_name, description, clone_url,
    is_private, language, default_branch, provider, coverage_percentage,
    test_count, scan_status, last_scan_at, last_coverage_update,
    created_at, updated_at
"#;

#[async_trait]
pub trait RepositoryRepository: Send + Sync {
    async fn create(&self, user_id: &str, data: &RepositoryCreate)
        -> Result<Repository, ApiError>;
    async fn find_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<Repository>, ApiError>;

    /// Lookup scoped to the owning user; absence is `None`, never an error.
    async fn find_scoped(&self, id: &str, user_id: &str) -> Result<Option<Repository>, ApiError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Repository>, ApiError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Repository>, ApiError>;
    async fn count_for_user(&self, user_id: &str) -> Result<i64, ApiError>;

    /// Delete scoped to the owning user; returns whether a row was removed.
    /// Scan results cascade at the storage layer.
    async fn delete_scoped(&self, id: &str, user_id: &str) -> Result<bool, ApiError>;

    async fn set_scan_status(&self, id: &str, status: &str) -> Result<bool, ApiError>;
    async fn set_coverage(
        &self,
        id: &str,
        coverage_percentage: f64,
        test_count: i64,
    ) -> Result<bool, ApiError>;
}

pub struct SqlxRepositoryRepository {
    pool: DatabasePool,
}

impl SqlxRepositoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RepositoryRepository for SqlxRepositoryRepository {
    async fn create(
        &self,
        user_id: &str,
        data: &RepositoryCreate,
    ) -> Result<Repository, ApiError> {
        let now = Utc::now();
        let repository = Repository {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            external_id: data.external_id.clone(),
            name: data.name.clone(),
            full_name: data.full_name.clone(),
            description: data.description.clone(),
            clone_url: data.clone_url.clone(),
            is_private: data.is_private,
            language: data.language.clone(),
            default_branch: data.default_branch.clone(),
            provider: data.provider.clone(),
            coverage_percentage: None,
            test_count: None,
            scan_status: "pending".to_string(),
            last_scan_at: None,
            last_coverage_update: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO repositories
                (id, user_id, external_id, name, full_name, description, clone_url,
                 is_private, language, default_branch, provider, scan_status,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&repository.id)
        .bind(&repository.user_id)
        .bind(&repository.external_id)
        .bind(&repository.name)
        .bind(&repository.full_name)
        .bind(&repository.description)
        .bind(&repository.clone_url)
        .bind(repository.is_private)
        .bind(&repository.language)
        .bind(&repository.default_branch)
        .bind(&repository.provider)
        .bind(&repository.scan_status)
        .bind(repository.created_at)
        .bind(repository.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(repository)
    }

    async fn find_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<Repository>, ApiError> {
        let repository = sqlx::query_as::<_, Repository>(&format!(
            "SELECT {REPOSITORY_COLUMNS} FROM repositories \
             WHERE user_id = ? AND external_id = ? AND provider = ?"
        ))
        .bind(user_id)
        .bind(external_id)
        .bind(provider)
        .fetch_optional(&self.pool)
        .await?;

        Ok(repository)
    }

    async fn find_scoped(&self, id: &str, user_id: &str) -> Result<Option<Repository>, ApiError> {
        let repository = sqlx::query_as::<_, Repository>(&format!(
            "SELECT {REPOSITORY_COLUMNS} FROM repositories WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(repository)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Repository>, ApiError> {
        let repository = sqlx::query_as::<_, Repository>(&format!(
            "SELECT {REPOSITORY_COLUMNS} FROM repositories WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(repository)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Repository>, ApiError> {
        // Creation order keeps listings deterministic.
        let repositories = sqlx::query_as::<_, Repository>(&format!(
            "SELECT {REPOSITORY_COLUMNS} FROM repositories \
             WHERE user_id = ? ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(repositories)
    }

    async fn count_for_user(&self, user_id: &str) -> Result<i64, ApiError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM repositories WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn delete_scoped(&self, id: &str, user_id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_scan_status(&self, id: &str, status: &str) -> Result<bool, ApiError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE repositories SET scan_status = ?, last_scan_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_coverage(
        &self,
        id: &str,
        coverage_percentage: f64,
        test_count: i64,
    ) -> Result<bool, ApiError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE repositories
            SET coverage_percentage = ?, test_count = ?, last_coverage_update = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(coverage_percentage)
        .bind(test_count)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
