//! Function routes. Unlike the rest of the API these never surface an HTTP
//! error: every outcome is a 200 with a `{data, error}` envelope where
//! exactly one side is set.

use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{error::ApiError, middleware::CurrentUser, AppState};

#[derive(Debug, Serialize)]
pub struct FunctionEnvelope {
    pub data: Option<Value>,
    pub error: Option<String>,
}

fn envelope<T: Serialize>(result: Result<T, ApiError>) -> Json<FunctionEnvelope> {
    match result.and_then(|value| serde_json::to_value(value).map_err(ApiError::from)) {
        Ok(data) => Json(FunctionEnvelope {
            data: Some(data),
            error: None,
        }),
        Err(e) => Json(FunctionEnvelope {
            data: None,
            error: Some(e.to_string()),
        }),
    }
}

fn required_str(body: &Value, key: &str) -> Result<String, ApiError> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(format!("{key} is required")))
}

fn optional_str(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub async fn detect_current_version(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Json<FunctionEnvelope> {
    let result = async {
        let repository_id = optional_str(&body, "repositoryId");
        let technology = required_str(&body, "technology")?;
        state
            .version_service
            .detect_current_version(&repository_id, &technology)
            .await
    }
    .await;

    envelope(result)
}

pub async fn create_upgrade_pr(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Json<FunctionEnvelope> {
    let result = async {
        let repository_id = optional_str(&body, "repositoryId");
        let technology = required_str(&body, "technology")?;
        let target_version = required_str(&body, "targetVersion")?;
        state
            .version_service
            .create_upgrade_pr(&repository_id, &technology, &target_version)
            .await
    }
    .await;

    envelope(result)
}

pub async fn fix_vulnerability(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Json<FunctionEnvelope> {
    let result = async {
        let repository_id = optional_str(&body, "repositoryId");
        let vulnerability_id = required_str(&body, "vulnerabilityId")?;
        let package_name = required_str(&body, "packageName")?;
        let current_version = optional_str(&body, "currentVersion");
        let fixed_version = optional_str(&body, "fixedVersion");
        let repository_full_name = required_str(&body, "repositoryFullName")?;
        state
            .security_service
            .fix_vulnerability(
                &repository_id,
                &vulnerability_id,
                &package_name,
                &current_version,
                &fixed_version,
                &repository_full_name,
            )
            .await
    }
    .await;

    envelope(result)
}

pub async fn fetch_coverage_data(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Json<FunctionEnvelope> {
    let repository_ids: Vec<String> = body
        .get("repositoryIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    envelope(state.coverage_service.fetch_coverage_data(&repository_ids).await)
}

pub async fn improve_coverage(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> Json<FunctionEnvelope> {
    let repositories: Vec<Value> = body
        .get("repositories")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    envelope(state.coverage_service.improve_coverage(&repositories).await)
}
