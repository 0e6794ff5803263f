// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::database::models::AdminUser;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Rehydrate the admin user behind the session token
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<AdminUser> {
    let user = state
        .gate
        .get_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Session user no longer exists"))?;

    Ok(ApiResponse::success(user))
}
