use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::ApiError, models::User, AppState};

/// The authenticated user for this request, attached by the middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer token authentication middleware. Missing, malformed and expired
/// tokens are deliberately indistinguishable: all yield the same 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or_else(|| ApiError::authentication("Invalid token"))?;

    let user = state
        .auth_service
        .resolve_current_user(&token)
        .await
        .map_err(|_| ApiError::authentication("Invalid token"))?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
