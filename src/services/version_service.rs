use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{Finding, ScanResultStatus, Upgrade},
    repositories::{RepositoryRepository, ScanResultRepository},
    services::security_service::PullRequestResult,
    services::sources::{catalog, DelayWindow, UpgradeSource},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedVersion {
    pub current_version: String,
    pub repository_id: String,
    pub technology: String,
}

pub struct VersionService {
    source: Arc<dyn UpgradeSource + Send + Sync>,
    scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
    repositories: Arc<dyn RepositoryRepository + Send + Sync>,
    stub_delay: DelayWindow,
}

impl VersionService {
    pub fn new(
        source: Arc<dyn UpgradeSource + Send + Sync>,
        scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
        repositories: Arc<dyn RepositoryRepository + Send + Sync>,
        stub_delay: DelayWindow,
    ) -> Self {
        Self {
            source,
            scan_results,
            repositories,
            stub_delay,
        }
    }

    /// Scan a repository for version upgrades, persist each finding and
    /// return the list to the caller.
    pub async fn scan_repository(
        &self,
        repository_id: &str,
        repository_name: &str,
        _full_name: &str,
        language: Option<&str>,
    ) -> Result<Vec<Upgrade>, ApiError> {
        let candidates = self.source.find_upgrades(language).await?;

        let upgrades: Vec<Upgrade> = candidates
            .into_iter()
            .map(|c| Upgrade {
                repository: repository_name.to_string(),
                repository_id: repository_id.to_string(),
                platform: "GitHub".to_string(),
                technology: c.technology.to_string(),
                current_version: c.current_version.to_string(),
                target_version: c.target_version.to_string(),
                status: ScanResultStatus::Open,
                priority: c.priority.to_string(),
            })
            .collect();

        for upgrade in &upgrades {
            self.scan_results
                .insert(&Finding::Version(upgrade.clone()).into_scan_result(repository_id))
                .await?;
        }

        let _ = self
            .repositories
            .set_scan_status(repository_id, "completed")
            .await?;

        tracing::info!(
            repository_id = %repository_id,
            findings = upgrades.len(),
            "version scan completed"
        );

        Ok(upgrades)
    }

    /// Mock version detection from a static technology table.
    pub async fn detect_current_version(
        &self,
        repository_id: &str,
        technology: &str,
    ) -> Result<DetectedVersion, ApiError> {
        let current_version = catalog::known_version(&technology.to_lowercase())
            .unwrap_or("1.0.0")
            .to_string();

        Ok(DetectedVersion {
            current_version,
            repository_id: repository_id.to_string(),
            technology: technology.to_string(),
        })
    }

    /// Mock upgrade pull request; no VCS interaction happens.
    pub async fn create_upgrade_pr(
        &self,
        _repository_id: &str,
        technology: &str,
        target_version: &str,
    ) -> Result<PullRequestResult, ApiError> {
        self.stub_delay.wait().await;

        let pr_number = rand::thread_rng().gen_range(1000..=9999);
        let pr_url = format!("https://github.com/mock/repo/pull/{pr_number}");

        Ok(PullRequestResult {
            success: true,
            pull_request_number: pr_number,
            pull_request_url: pr_url,
            message: format!("Upgrade {technology} to {target_version}"),
        })
    }
}
