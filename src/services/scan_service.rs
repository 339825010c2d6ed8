use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{ScanResult, ScanResultCreate, ScanResultUpdate, ScanStatistics, ScanType},
    repositories::ScanResultRepository,
};

/// Generic CRUD and statistics over the polymorphic scan_results store.
pub struct ScanService {
    scan_results: Arc<dyn ScanResultRepository + Send + Sync>,
}

impl ScanService {
    pub fn new(scan_results: Arc<dyn ScanResultRepository + Send + Sync>) -> Self {
        Self { scan_results }
    }

    pub async fn create_scan_result(
        &self,
        data: &ScanResultCreate,
    ) -> Result<ScanResult, ApiError> {
        self.scan_results.insert(data).await
    }

    pub async fn get_scan_result(&self, scan_id: &str) -> Result<Option<ScanResult>, ApiError> {
        self.scan_results.find_by_id(scan_id).await
    }

    pub async fn get_scan_results(
        &self,
        repository_id: &str,
        scan_type: Option<ScanType>,
    ) -> Result<Vec<ScanResult>, ApiError> {
        self.scan_results
            .list_for_repository(repository_id, scan_type)
            .await
    }

    pub async fn get_recent_scans(
        &self,
        repository_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanResult>, ApiError> {
        self.scan_results
            .recent_for_repository(repository_id, limit)
            .await
    }

    pub async fn update_scan_result(
        &self,
        scan_id: &str,
        update: &ScanResultUpdate,
    ) -> Result<Option<ScanResult>, ApiError> {
        self.scan_results.update(scan_id, update).await
    }

    pub async fn delete_scan_result(&self, scan_id: &str) -> Result<bool, ApiError> {
        self.scan_results.delete(scan_id).await
    }

    /// Plain tallies over the repository's current record set, recomputed on
    /// every call.
    pub async fn get_scan_statistics(
        &self,
        repository_id: &str,
    ) -> Result<ScanStatistics, ApiError> {
        let results = self
            .scan_results
            .list_for_repository(repository_id, None)
            .await?;
        Ok(ScanStatistics::from_results(&results))
    }
}
