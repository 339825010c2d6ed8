use axum::{
    extract::{Extension, State},
    response::Json,
};

use crate::{error::ApiError, middleware::CurrentUser, models::DashboardMetrics, AppState};

pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let metrics = state
        .repository_service
        .get_dashboard_metrics(&user.id)
        .await?;

    Ok(Json(metrics))
}
