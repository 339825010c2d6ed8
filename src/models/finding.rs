use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::scan_result::{ScanResultCreate, ScanResultStatus, ScanType, Severity};

/// A known security vulnerability reported against a repository.
#[derive(Debug, Clone, Serialize)]
pub struct Vulnerability {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub cvss: f64,
    pub package: String,
    pub version: String,
    pub fixed_in: String,
    pub status: ScanResultStatus,
    pub discovered_date: String,
    pub description: String,
    pub repository: String,
    pub repository_id: String,
    pub platform: String,
}

/// A suggested technology upgrade for a repository.
#[derive(Debug, Clone, Serialize)]
pub struct Upgrade {
    pub repository: String,
    pub repository_id: String,
    pub platform: String,
    pub technology: String,
    pub current_version: String,
    pub target_version: String,
    pub status: ScanResultStatus,
    pub priority: String,
}

/// A test-coverage snapshot for a repository.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageData {
    pub repository_id: String,
    pub coverage_percentage: f64,
    pub test_count: i64,
    pub last_updated: DateTime<Utc>,
    pub language: Option<String>,
}

/// A single scan finding. Held as a tagged variant internally and flattened
/// into the generic scan_results schema only at the persistence boundary.
#[derive(Debug, Clone)]
pub enum Finding {
    Security(Vulnerability),
    Version(Upgrade),
    Coverage(CoverageData),
}

impl Finding {
    pub fn scan_type(&self) -> ScanType {
        match self {
            Finding::Security(_) => ScanType::Security,
            Finding::Version(_) => ScanType::Version,
            Finding::Coverage(_) => ScanType::Coverage,
        }
    }

    /// Flatten the finding into a scan_results row.
    pub fn into_scan_result(self, repository_id: &str) -> ScanResultCreate {
        match self {
            Finding::Security(vuln) => ScanResultCreate {
                repository_id: repository_id.to_string(),
                scan_type: ScanType::Security,
                title: vuln.title,
                description: Some(vuln.description),
                severity: Some(vuln.severity),
                status: vuln.status,
                file_path: None,
                line_number: None,
                package_name: Some(vuln.package),
                current_version: Some(vuln.version),
                recommended_version: Some(vuln.fixed_in),
                coverage_percentage: None,
                rule_id: Some(vuln.id),
                metadata_json: None,
            },
            Finding::Version(upgrade) => ScanResultCreate {
                repository_id: repository_id.to_string(),
                scan_type: ScanType::Version,
                title: format!("Upgrade {}", upgrade.technology),
                description: Some(format!(
                    "Upgrade {} from {} to {}",
                    upgrade.technology, upgrade.current_version, upgrade.target_version
                )),
                severity: None,
                status: upgrade.status,
                file_path: None,
                line_number: None,
                package_name: Some(upgrade.technology),
                current_version: Some(upgrade.current_version),
                recommended_version: Some(upgrade.target_version),
                coverage_percentage: None,
                rule_id: None,
                metadata_json: Some(json!({ "priority": upgrade.priority }).to_string()),
            },
            // Coverage snapshots are terminal records, not open issues.
            Finding::Coverage(coverage) => ScanResultCreate {
                repository_id: repository_id.to_string(),
                scan_type: ScanType::Coverage,
                title: "Test Coverage Analysis".to_string(),
                description: Some(format!(
                    "Coverage: {:.1}%, Tests: {}",
                    coverage.coverage_percentage, coverage.test_count
                )),
                severity: None,
                status: ScanResultStatus::Resolved,
                file_path: None,
                line_number: None,
                package_name: None,
                current_version: None,
                recommended_version: None,
                coverage_percentage: Some(coverage.coverage_percentage),
                rule_id: None,
                metadata_json: None,
            },
        }
    }
}

/// Tallies for one security scan's findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: i64,
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

impl ScanSummary {
    pub fn from_vulnerabilities(vulnerabilities: &[Vulnerability]) -> Self {
        let by_severity = |severity: Severity| {
            vulnerabilities.iter().filter(|v| v.severity == severity).count() as i64
        };
        Self {
            total: vulnerabilities.len() as i64,
            critical: by_severity(Severity::Critical),
            high: by_severity(Severity::High),
            medium: by_severity(Severity::Medium),
            low: by_severity(Severity::Low),
        }
    }
}

/// Shared request shape for the three scan endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub repository_id: String,
    pub repository_name: String,
    pub full_name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub scan_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SecurityScanResponse {
    pub success: bool,
    pub repository_id: String,
    pub repository_name: String,
    pub vulnerabilities: Vec<Vulnerability>,
    pub scan_date: DateTime<Utc>,
    pub summary: ScanSummary,
}

#[derive(Debug, Serialize)]
pub struct VersionScanResponse {
    pub success: bool,
    pub repository_id: String,
    pub repository_name: String,
    pub upgrades: Vec<Upgrade>,
    pub scan_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CoverageScanResponse {
    pub success: bool,
    pub repository_id: String,
    pub repository_name: String,
    pub coverage_data: CoverageData,
    pub scan_date: DateTime<Utc>,
}
