// handlers/protected/notification/schedule.rs - POST /api/notification/schedule handler

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::Schedule;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/notification/schedule - Save a schedule and forward it to the scheduler
///
/// The row is kept even when the scheduler refuses it; that case answers
/// 502 with the scheduler's message so the operator can retry.
pub async fn schedule_post(
    State(state): State<AppState>,
    Json(schedule): Json<Schedule>,
) -> ApiResult<Schedule> {
    state.notifications.save_schedule(&schedule).await?;
    Ok(ApiResponse::created(schedule))
}
