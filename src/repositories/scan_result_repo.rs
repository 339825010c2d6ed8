use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{ScanResult, ScanResultCreate, ScanResultStatus, ScanResultUpdate, ScanType},
};

const SCAN_RESULT_COLUMNS: &str = r#"
    id, repository_id, scan_type, title, description, severity, status,
    file_path, line_number, package_name, current_version, recommended_version,
    coverage_percentage, rule_id, metadata_json, created_at, updated_at
"#;

#[async_trait]
pub trait ScanResultRepository: Send + Sync {
    async fn insert(&self, data: &ScanResultCreate) -> Result<ScanResult, ApiError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ScanResult>, ApiError>;
    async fn list_for_repository(
        &self,
        repository_id: &str,
        scan_type: Option<ScanType>,
    ) -> Result<Vec<ScanResult>, ApiError>;
    async fn recent_for_repository(
        &self,
        repository_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanResult>, ApiError>;

    /// All scan results across a user's repositories.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScanResult>, ApiError>;

    async fn update(
        &self,
        id: &str,
        update: &ScanResultUpdate,
    ) -> Result<Option<ScanResult>, ApiError>;
    async fn update_status(&self, id: &str, status: ScanResultStatus) -> Result<bool, ApiError>;
    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
}

pub struct SqlxScanResultRepository {
    pool: DatabasePool,
}

impl SqlxScanResultRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanResultRepository for SqlxScanResultRepository {
    async fn insert(&self, data: &ScanResultCreate) -> Result<ScanResult, ApiError> {
        let now = Utc::now();
        let result = ScanResult {
            id: Uuid::new_v4().to_string(),
            repository_id: data.repository_id.clone(),
            scan_type: data.scan_type,
            title: data.title.clone(),
            description: data.description.clone(),
            severity: data.severity,
            status: data.status,
            file_path: data.file_path.clone(),
            line_number: data.line_number,
            package_name: data.package_name.clone(),
            current_version: data.current_version.clone(),
            recommended_version: data.recommended_version.clone(),
            coverage_percentage: data.coverage_percentage,
            rule_id: data.rule_id.clone(),
            metadata_json: data.metadata_json.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO scan_results
                (id, repository_id, scan_type, title, description, severity, status,
                 file_path, line_number, package_name, current_version,
                 recommended_version, coverage_percentage, rule_id, metadata_json,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&result.id)
        .bind(&result.repository_id)
        .bind(result.scan_type)
        .bind(&result.title)
        .bind(&result.description)
        .bind(result.severity)
        .bind(result.status)
        .bind(&result.file_path)
        .bind(result.line_number)
        .bind(&result.package_name)
        .bind(&result.current_version)
        .bind(&result.recommended_version)
        .bind(result.coverage_percentage)
        .bind(&result.rule_id)
        .bind(&result.metadata_json)
        .bind(result.created_at)
        .bind(result.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ScanResult>, ApiError> {
        let result = sqlx::query_as::<_, ScanResult>(&format!(
            "SELECT {SCAN_RESULT_COLUMNS} FROM scan_results WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn list_for_repository(
        &self,
        repository_id: &str,
        scan_type: Option<ScanType>,
    ) -> Result<Vec<ScanResult>, ApiError> {
        let results = match scan_type {
            Some(scan_type) => {
                sqlx::query_as::<_, ScanResult>(&format!(
                    "SELECT {SCAN_RESULT_COLUMNS} FROM scan_results \
                     WHERE repository_id = ? AND scan_type = ? \
                     ORDER BY created_at ASC, rowid ASC"
                ))
                .bind(repository_id)
                .bind(scan_type)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ScanResult>(&format!(
                    "SELECT {SCAN_RESULT_COLUMNS} FROM scan_results \
                     WHERE repository_id = ? ORDER BY created_at ASC, rowid ASC"
                ))
                .bind(repository_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(results)
    }

    async fn recent_for_repository(
        &self,
        repository_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanResult>, ApiError> {
        let results = sqlx::query_as::<_, ScanResult>(&format!(
            "SELECT {SCAN_RESULT_COLUMNS} FROM scan_results \
             WHERE repository_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?"
        ))
        .bind(repository_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScanResult>, ApiError> {
        let results = sqlx::query_as::<_, ScanResult>(
            r#"
            SELECT sr.id, sr.repository_id, sr.scan_type, sr.title, sr.description,
                   sr.severity, sr.status, sr.file_path, sr.line_number,
                   sr.package_name, sr.current_version, sr.recommended_version,
                   sr.coverage_percentage, sr.rule_id, sr.metadata_json,
                   sr.created_at, sr.updated_at
            FROM scan_results sr
            JOIN repositories r ON r.id = sr.repository_id
            WHERE r.user_id = ?
            ORDER BY sr.created_at ASC, sr.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn update(
        &self,
        id: &str,
        update: &ScanResultUpdate,
    ) -> Result<Option<ScanResult>, ApiError> {
        let Some(mut result) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = &update.title {
            result.title = title.clone();
        }
        if let Some(description) = &update.description {
            result.description = Some(description.clone());
        }
        if let Some(severity) = update.severity {
            result.severity = Some(severity);
        }
        if let Some(status) = update.status {
            result.status = status;
        }
        if let Some(metadata_json) = &update.metadata_json {
            result.metadata_json = Some(metadata_json.clone());
        }
        result.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE scan_results
            SET title = ?, description = ?, severity = ?, status = ?,
                metadata_json = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&result.title)
        .bind(&result.description)
        .bind(result.severity)
        .bind(result.status)
        .bind(&result.metadata_json)
        .bind(result.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(result))
    }

    async fn update_status(&self, id: &str, status: ScanResultStatus) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE scan_results SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM scan_results WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
