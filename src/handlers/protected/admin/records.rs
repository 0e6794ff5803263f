// handlers/protected/admin/records.rs - record level handlers

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/admin/:model?limit=&offset= - List records of `<namespace>.<model>`
pub async fn records_list(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(page): Query<Page>,
) -> ApiResult<Vec<Value>> {
    let records = state.admin.list(&model, page.limit, page.offset).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/admin/:model/:id
pub async fn record_get(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let record = state
        .admin
        .get(&model, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} '{}' not found", model, id)))?;

    Ok(ApiResponse::success(record))
}

/// DELETE /api/admin/:model/:id
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((model, id)): Path<(String, String)>,
) -> ApiResult<()> {
    if !state.admin.delete(&model, &id).await? {
        return Err(ApiError::not_found(format!("{} '{}' not found", model, id)));
    }

    tracing::info!(admin = %auth.email, model = %model, id = %id, "Record removed via admin API");
    Ok(ApiResponse::no_content())
}
