//! Pluggable finding sources backing the scan services.
//!
//! The traits isolate where findings come from so a real scanner can be
//! substituted later without touching persistence, aggregation or the
//! dashboard. The mock implementations emulate external scan latency with a
//! non-blocking sleep and draw findings from fixed language-keyed tables.

pub mod catalog;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::error::ApiError;
use self::catalog::{
    coverage_profile_for, upgrades_for, vulnerabilities_for, UpgradeCandidate,
    VulnerabilityCandidate,
};

/// Bounds for the simulated scan latency.
#[derive(Debug, Clone, Copy)]
pub struct DelayWindow {
    min: Duration,
    max: Duration,
}

impl DelayWindow {
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms.min(max_ms)),
            max: Duration::from_millis(min_ms.max(max_ms)),
        }
    }

    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }

    /// Suspend for a uniformly random duration inside the window. Uses a
    /// non-blocking sleep so concurrent scans never occupy a worker thread.
    pub async fn wait(&self) {
        if self.max.is_zero() {
            return;
        }
        let millis = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min.as_millis() as u64..=self.max.as_millis() as u64)
        };
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    /// Produce vulnerability findings for a repository in the given language.
    async fn find_vulnerabilities(
        &self,
        language: Option<&str>,
    ) -> Result<Vec<VulnerabilityCandidate>, ApiError>;
}

#[async_trait]
pub trait UpgradeSource: Send + Sync {
    /// Produce version upgrade findings for the given language.
    async fn find_upgrades(
        &self,
        language: Option<&str>,
    ) -> Result<Vec<UpgradeCandidate>, ApiError>;
}

/// One synthesized coverage reading.
#[derive(Debug, Clone, Copy)]
pub struct CoverageMeasurement {
    pub coverage_percentage: f64,
    pub test_count: i64,
}

#[async_trait]
pub trait CoverageSource: Send + Sync {
    /// Measure test coverage for the given language.
    async fn measure(&self, language: Option<&str>) -> Result<CoverageMeasurement, ApiError>;
}

/// Draw a uniformly random subset (size 0..=N, without replacement) from a
/// candidate table.
fn random_subset<T: Copy>(candidates: &[T]) -> Vec<T> {
    let mut rng = rand::thread_rng();
    let n = rng.gen_range(0..=candidates.len());
    candidates.choose_multiple(&mut rng, n).copied().collect()
}

pub struct MockVulnerabilitySource {
    delay: DelayWindow,
}

impl MockVulnerabilitySource {
    pub fn new(delay: DelayWindow) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl VulnerabilitySource for MockVulnerabilitySource {
    async fn find_vulnerabilities(
        &self,
        language: Option<&str>,
    ) -> Result<Vec<VulnerabilityCandidate>, ApiError> {
        self.delay.wait().await;

        let table = language.map(vulnerabilities_for).unwrap_or(&[]);
        Ok(random_subset(table))
    }
}

pub struct MockUpgradeSource {
    delay: DelayWindow,
}

impl MockUpgradeSource {
    pub fn new(delay: DelayWindow) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl UpgradeSource for MockUpgradeSource {
    async fn find_upgrades(
        &self,
        language: Option<&str>,
    ) -> Result<Vec<UpgradeCandidate>, ApiError> {
        self.delay.wait().await;

        let table = language.map(upgrades_for).unwrap_or(&[]);
        Ok(random_subset(table))
    }
}

pub struct MockCoverageSource {
    delay: DelayWindow,
}

impl MockCoverageSource {
    pub fn new(delay: DelayWindow) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CoverageSource for MockCoverageSource {
    async fn measure(&self, language: Option<&str>) -> Result<CoverageMeasurement, ApiError> {
        self.delay.wait().await;

        let profile = coverage_profile_for(language.unwrap_or(""));
        let (coverage_percentage, test_count) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(profile.min_coverage..=profile.max_coverage),
                rng.gen_range(profile.min_tests..=profile.max_tests),
            )
        };

        Ok(CoverageMeasurement {
            coverage_percentage,
            test_count,
        })
    }
}
