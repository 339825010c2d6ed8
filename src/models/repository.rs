use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered source repository owned by exactly one user. Carries the
/// denormalized scan-status and coverage snapshots the dashboard reads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Repository {
    pub id: String,
    pub user_id: String,
    pub external_id: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub clone_url: String,
    pub is_private: bool,
    pub language: Option<String>,
    pub default_branch: String,
    pub provider: String,
    pub coverage_percentage: Option<f64>,
    pub test_count: Option<i64>,
    pub scan_status: String,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub last_coverage_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryCreate {
    pub external_id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub clone_url: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct RepositoryList {
    pub repositories: Vec<Repository>,
}
