//! Feedback API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::feedback;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Feedback, FeedbackCreate};
use shared::response::PaginatedResponse;

/// Query params for listing feedback
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// POST /api/feedback - 提交反馈
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FeedbackCreate>,
) -> AppResult<Json<Feedback>> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    let row = feedback::create(&state.pool, &payload).await?;
    Ok(Json(row))
}

/// GET /api/feedback - 反馈列表（最新在前，分页）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Feedback>>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, 100);
    let (rows, total) = feedback::find_page(&state.pool, page, per_page).await?;
    Ok(Json(PaginatedResponse::new(rows, page, per_page, total)))
}
