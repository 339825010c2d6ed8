use axum::{
    extract::{Extension, State},
    response::Json,
};
use chrono::Utc;

use crate::{
    error::ApiError,
    middleware::CurrentUser,
    models::{
        CoverageScanResponse, ScanRequest, SecurityScanResponse, VersionScanResponse,
    },
    services::SecurityService,
    AppState,
};

pub async fn run_security_scan(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<SecurityScanResponse>, ApiError> {
    let vulnerabilities = state
        .security_service
        .scan_repository(
            &request.repository_id,
            &request.repository_name,
            &request.full_name,
            request.language.as_deref(),
        )
        .await?;

    let summary = SecurityService::get_scan_summary(&vulnerabilities);

    Ok(Json(SecurityScanResponse {
        success: true,
        repository_id: request.repository_id,
        repository_name: request.repository_name,
        vulnerabilities,
        scan_date: request.scan_date.unwrap_or_else(Utc::now),
        summary,
    }))
}

pub async fn run_version_scan(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<VersionScanResponse>, ApiError> {
    let upgrades = state
        .version_service
        .scan_repository(
            &request.repository_id,
            &request.repository_name,
            &request.full_name,
            request.language.as_deref(),
        )
        .await?;

    Ok(Json(VersionScanResponse {
        success: true,
        repository_id: request.repository_id,
        repository_name: request.repository_name,
        upgrades,
        scan_date: request.scan_date.unwrap_or_else(Utc::now),
    }))
}

pub async fn run_coverage_scan(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<CoverageScanResponse>, ApiError> {
    let coverage_data = state
        .coverage_service
        .scan_repository(
            &request.repository_id,
            &request.repository_name,
            &request.full_name,
            request.language.as_deref(),
        )
        .await?;

    Ok(Json(CoverageScanResponse {
        success: true,
        repository_id: request.repository_id,
        repository_name: request.repository_name,
        coverage_data,
        scan_date: request.scan_date.unwrap_or_else(Utc::now),
    }))
}
