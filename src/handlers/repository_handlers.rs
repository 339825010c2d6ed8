use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    middleware::CurrentUser,
    models::{Repository, RepositoryCreate, RepositoryList},
    AppState,
};

pub async fn list_repositories(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<RepositoryList>, ApiError> {
    let repositories = state
        .repository_service
        .get_user_repositories(&user.id)
        .await?;

    Ok(Json(RepositoryList { repositories }))
}

pub async fn create_repository(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<RepositoryCreate>,
) -> Result<Json<Repository>, ApiError> {
    let repository = state
        .repository_service
        .create_repository(&user.id, &payload)
        .await?;

    Ok(Json(repository))
}

pub async fn get_repository(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(repo_id): Path<String>,
) -> Result<Json<Repository>, ApiError> {
    let repository = state
        .repository_service
        .get_repository(&repo_id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Repository not found"))?;

    Ok(Json(repository))
}

pub async fn delete_repository(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(repo_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .repository_service
        .delete_repository(&repo_id, &user.id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Repository not found"));
    }

    Ok(Json(json!({ "message": "Repository deleted successfully" })))
}
