use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{DashboardMetrics, Repository, RepositoryCreate},
    repositories::{RepositoryRepository, ScanResultRepository},
};

pub struct RepositoryService {
    repositories: Arc<dyn RepositoryRepository + Send + Sync>,
    scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
}

impl RepositoryService {
    pub fn new(
        repositories: Arc<dyn RepositoryRepository + Send + Sync>,
        scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
    ) -> Self {
        Self {
            repositories,
            scan_results,
        }
    }

    /// Register a repository for a user. The same external identity can be
    /// registered at most once per owner.
    pub async fn create_repository(
        &self,
        user_id: &str,
        data: &RepositoryCreate,
    ) -> Result<Repository, ApiError> {
        if self
            .repositories
            .find_by_external_id(user_id, &data.external_id, &data.provider)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("Repository already exists for this user"));
        }

        let repository = self.repositories.create(user_id, data).await?;
        tracing::info!(
            repository_id = %repository.id,
            user_id = %user_id,
            "registered repository"
        );
        Ok(repository)
    }

    pub async fn get_user_repositories(&self, user_id: &str) -> Result<Vec<Repository>, ApiError> {
        self.repositories.list_for_user(user_id).await
    }

    /// Absence is `None`, never an error; other users' repositories are
    /// invisible here.
    pub async fn get_repository(
        &self,
        repo_id: &str,
        user_id: &str,
    ) -> Result<Option<Repository>, ApiError> {
        self.repositories.find_scoped(repo_id, user_id).await
    }

    pub async fn get_repository_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<Repository>, ApiError> {
        self.repositories
            .find_by_external_id(user_id, external_id, provider)
            .await
    }

    /// Returns whether a repository was deleted; `false` covers both missing
    /// and foreign rows.
    pub async fn delete_repository(&self, repo_id: &str, user_id: &str) -> Result<bool, ApiError> {
        self.repositories.delete_scoped(repo_id, user_id).await
    }

    pub async fn update_repository_scan_status(
        &self,
        repo_id: &str,
        status: &str,
    ) -> Result<bool, ApiError> {
        self.repositories.set_scan_status(repo_id, status).await
    }

    pub async fn update_repository_coverage(
        &self,
        repo_id: &str,
        coverage_percentage: f64,
        test_count: i64,
    ) -> Result<bool, ApiError> {
        self.repositories
            .set_coverage(repo_id, coverage_percentage, test_count)
            .await
    }

    /// Summary metrics for one user, recomputed from raw rows on every call.
    pub async fn get_dashboard_metrics(
        &self,
        user_id: &str,
    ) -> Result<DashboardMetrics, ApiError> {
        let total_repositories = self.repositories.count_for_user(user_id).await?;
        let scan_results = self.scan_results.list_for_user(user_id).await?;
        Ok(DashboardMetrics::compute(total_repositories, &scan_results))
    }
}
