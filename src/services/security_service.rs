use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{Finding, ScanResultStatus, ScanSummary, Vulnerability},
    repositories::{RepositoryRepository, ScanResultRepository},
    services::sources::{DelayWindow, VulnerabilitySource},
};

/// Result of a mock fix/upgrade pull request, serialized with the camelCase
/// keys the function routes expose.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestResult {
    pub success: bool,
    pub pull_request_number: u32,
    pub pull_request_url: String,
    pub message: String,
}

pub struct SecurityService {
    source: Arc<dyn VulnerabilitySource + Send + Sync>,
    scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
    repositories: Arc<dyn RepositoryRepository + Send + Sync>,
    stub_delay: DelayWindow,
}

impl SecurityService {
    pub fn new(
        source: Arc<dyn VulnerabilitySource + Send + Sync>,
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

    /// Scan a repository for vulnerabilities, persist each finding and
    /// return the list to the caller.
    pub async fn scan_repository(
        &self,
        repository_id: &str,
        repository_name: &str,
        _full_name: &str,
        language: Option<&str>,
    ) -> Result<Vec<Vulnerability>, ApiError> {
        let candidates = self.source.find_vulnerabilities(language).await?;
        let discovered_date = Utc::now().format("%Y-%m-%d").to_string();

        let vulnerabilities: Vec<Vulnerability> = candidates
            .into_iter()
            .map(|c| Vulnerability {
                id: c.id.to_string(),
                title: c.title.to_string(),
                severity: c.severity,
                cvss: c.cvss,
                package: c.package.to_string(),
                version: c.version.to_string(),
                fixed_in: c.fixed_in.to_string(),
                status: ScanResultStatus::Open,
                discovered_date: discovered_date.clone(),
                description: c.description.to_string(),
                repository: repository_name.to_string(),
                repository_id: repository_id.to_string(),
                platform: "GitHub".to_string(),
            })
            .collect();

        for vulnerability in &vulnerabilities {
            self.scan_results
                .insert(&Finding::Security(vulnerability.clone()).into_scan_result(repository_id))
                .await?;
        }

        // Bookkeeping only; a missing repository row is not an error here.
        let _ = self
            .repositories
            .set_scan_status(repository_id, "completed")
            .await?;

        tracing::info!(
            repository_id = %repository_id,
            findings = vulnerabilities.len(),
            "security scan completed"
        );

        Ok(vulnerabilities)
    }

    pub fn get_scan_summary(vulnerabilities: &[Vulnerability]) -> ScanSummary {
        ScanSummary::from_vulnerabilities(vulnerabilities)
    }

    /// Mock remediation: fabricates a pull request and moves the finding to
    /// in-progress. No VCS interaction happens.
    pub async fn fix_vulnerability(
        &self,
        _repository_id: &str,
        vulnerability_id: &str,
        package_name: &str,
        current_version: &str,
        fixed_version: &str,
        repository_full_name: &str,
    ) -> Result<PullRequestResult, ApiError> {
        self.stub_delay.wait().await;

        let pr_number = rand::thread_rng().gen_range(1000..=9999);
        let pr_url = format!("https://github.com/{repository_full_name}/pull/{pr_number}");

        let _ = self
            .scan_results
            .update_status(vulnerability_id, ScanResultStatus::InProgress)
            .await?;

        Ok(PullRequestResult {
            success: true,
            pull_request_number: pr_number,
            pull_request_url: pr_url,
            message: format!(
                "Upgrade {package_name} from {current_version} to {fixed_version}"
            ),
        })
    }
}
