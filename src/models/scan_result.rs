use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Classification tag partitioning findings into security/version/coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Security,
    Version,
    Coverage,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Security => "security",
            ScanType::Version => "version",
            ScanType::Coverage => "coverage",
        }
    }
}

/// Severity is meaningful only for security findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScanResultStatus {
    Open,
    InProgress,
    Resolved,
}

/// One persisted finding row. The polymorphic payload fields are used
/// selectively per scan type; `metadata_json` is the free-form escape hatch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanResult {
    pub id: String,
    pub repository_id: String,
    pub scan_type: ScanType,
    pub title: String,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub status: ScanResultStatus,
    pub file_path: Option<String>,
    pub line_number: Option<i64>,
    pub package_name: Option<String>,
    pub current_version: Option<String>,
    pub recommended_version: Option<String>,
    pub coverage_percentage: Option<f64>,
    pub rule_id: Option<String>,
    pub metadata_json: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanResultCreate {
    pub repository_id: String,
    pub scan_type: ScanType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default = "default_status")]
    pub status: ScanResultStatus,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub line_number: Option<i64>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub current_version: Option<String>,
    #[serde(default)]
    pub recommended_version: Option<String>,
    #[serde(default)]
    pub coverage_percentage: Option<f64>,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub metadata_json: Option<String>,
}

fn default_status() -> ScanResultStatus {
    ScanResultStatus::Open
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResultUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<ScanResultStatus>,
    pub metadata_json: Option<String>,
}

/// Plain tallies over a repository's current scan results, recomputed on
/// every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    pub total_scans: i64,
    pub security_scans: i64,
    pub version_scans: i64,
    pub coverage_scans: i64,
    pub open_issues: i64,
    pub resolved_issues: i64,
    pub critical_issues: i64,
    pub high_issues: i64,
}

impl ScanStatistics {
    pub fn from_results(results: &[ScanResult]) -> Self {
        fn count(results: &[ScanResult], pred: impl Fn(&ScanResult) -> bool) -> i64 {
            results.iter().filter(|r| pred(r)).count() as i64
        }

        Self {
            total_scans: results.len() as i64,
            security_scans: count(results, |r| r.scan_type == ScanType::Security),
            version_scans: count(results, |r| r.scan_type == ScanType::Version),
            coverage_scans: count(results, |r| r.scan_type == ScanType::Coverage),
            open_issues: count(results, |r| r.status == ScanResultStatus::Open),
            resolved_issues: count(results, |r| r.status == ScanResultStatus::Resolved),
            critical_issues: count(results, |r| r.severity == Some(Severity::Critical)),
            high_issues: count(results, |r| r.severity == Some(Severity::High)),
        }
    }
}

/// Dashboard summary for one user, recomputed from raw rows on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_repositories: i64,
    pub pending_updates: i64,
    pub vulnerabilities: i64,
    pub test_coverage: String,
}

impl DashboardMetrics {
    pub fn compute(total_repositories: i64, results: &[ScanResult]) -> Self {
        let pending_updates = results
            .iter()
            .filter(|r| r.scan_type == ScanType::Version && r.status == ScanResultStatus::Open)
            .count() as i64;

        let vulnerabilities = results
            .iter()
            .filter(|r| {
                r.scan_type == ScanType::Security
                    && r.status == ScanResultStatus::Open
                    && matches!(r.severity, Some(Severity::High) | Some(Severity::Critical))
            })
            .count() as i64;

        let coverage_values: Vec<f64> = results
            .iter()
            .filter(|r| r.scan_type == ScanType::Coverage)
            .filter_map(|r| r.coverage_percentage)
            .collect();

        let avg_coverage = if coverage_values.is_empty() {
            0.0
        } else {
            coverage_values.iter().sum::<f64>() / coverage_values.len() as f64
        };

        Self {
            total_repositories,
            pending_updates,
            vulnerabilities,
            test_coverage: format!("{avg_coverage:.0}%"),
        }
    }
}
