use axum::{
    extract::{Extension, State},
    response::Json,
};

use crate::{
    error::ApiError,
    middleware::CurrentUser,
    models::{AuthResponse, LoginRequest, RegisterRequest, User},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, access_token) = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        user,
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, access_token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        user,
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
