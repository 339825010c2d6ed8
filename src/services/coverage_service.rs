use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{CoverageData, Finding},
    repositories::{RepositoryRepository, ScanResultRepository},
    services::sources::{catalog, CoverageSource},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageImprovement {
    pub repository_id: Option<String>,
    pub suggested_tests: i64,
    pub estimated_coverage_increase: i64,
    pub priority: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageImprovementResult {
    pub success: bool,
    pub improvements: Vec<CoverageImprovement>,
}

pub struct CoverageService {
    source: Arc<dyn CoverageSource + Send + Sync>,
    scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
    repositories: Arc<dyn RepositoryRepository + Send + Sync>,
}

impl CoverageService {
    pub fn new(
        source: Arc<dyn CoverageSource + Send + Sync>,
        scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
        repositories: Arc<dyn RepositoryRepository + Send + Sync>,
    ) -> Self {
        Self {
            source,
            scan_results,
            repositories,
        }
    }

    /// Synthesize one coverage snapshot, persist it and refresh the
    /// repository's denormalized coverage fields.
    pub async fn scan_repository(
        &self,
        repository_id: &str,
        _repository_name: &str,
        _full_name: &str,
        language: Option<&str>,
    ) -> Result<CoverageData, ApiError> {
        let measurement = self.source.measure(language).await?;

        let coverage_data = CoverageData {
            repository_id: repository_id.to_string(),
            coverage_percentage: measurement.coverage_percentage,
            test_count: measurement.test_count,
            last_updated: Utc::now(),
            language: language.map(str::to_string),
        };

        self.scan_results
            .insert(&Finding::Coverage(coverage_data.clone()).into_scan_result(repository_id))
            .await?;

        let _ = self
            .repositories
            .set_coverage(
                repository_id,
                coverage_data.coverage_percentage,
                coverage_data.test_count,
            )
            .await?;

        tracing::info!(
            repository_id = %repository_id,
            coverage = coverage_data.coverage_percentage,
            "coverage scan completed"
        );

        Ok(coverage_data)
    }

    /// One randomized snapshot per requested repository id.
    pub async fn fetch_coverage_data(
        &self,
        repository_ids: &[String],
    ) -> Result<Vec<CoverageData>, ApiError> {
        let now = Utc::now();
        let mut rng = rand::thread_rng();

        let snapshots = repository_ids
            .iter()
            .map(|repo_id| CoverageData {
                repository_id: repo_id.clone(),
                coverage_percentage: rng.gen_range(60.0..=95.0),
                test_count: rng.gen_range(50..=500),
                last_updated: now,
                language: catalog::SCAN_LANGUAGES
                    .choose(&mut rng)
                    .map(|l| l.to_string()),
            })
            .collect();

        Ok(snapshots)
    }

    /// Randomized improvement suggestions for each repository in the request.
    pub async fn improve_coverage(
        &self,
        repositories: &[Value],
    ) -> Result<CoverageImprovementResult, ApiError> {
        let mut rng = rand::thread_rng();

        let improvements = repositories
            .iter()
            .map(|repo| CoverageImprovement {
                repository_id: repo
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                suggested_tests: rng.gen_range(5..=20),
                estimated_coverage_increase: rng.gen_range(5..=25),
                priority: ["high", "medium", "low"]
                    .choose(&mut rng)
                    .unwrap()
                    .to_string(),
                suggestions: vec![
                    "Add unit tests for untested functions".to_string(),
                    "Increase integration test coverage".to_string(),
                    "Add edge case testing".to_string(),
                ],
            })
            .collect();

        Ok(CoverageImprovementResult {
            success: true,
            improvements,
        })
    }
}
