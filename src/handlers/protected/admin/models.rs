// handlers/protected/admin/models.rs - GET /api/admin/models handler

use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ModelRoute;

/// GET /api/admin/models - Registered models and the database each lives in
pub async fn models_list(State(state): State<AppState>) -> ApiResult<Vec<ModelRoute>> {
    Ok(ApiResponse::success(state.admin.models()))
}
